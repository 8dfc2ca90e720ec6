//! Network layer - HTTP calls against the registration backend
//!
//! The Network actor receives commands and sends back outcome messages.

pub mod actor;
pub mod client;

pub use actor::NetworkActor;
pub use client::ApiClient;

//! # Registrar TUI
//!
//! A terminal registration client: fill in a form, submit it to the
//! registration backend as multipart form data, and browse everyone who
//! has registered.
//!
//! ## Features
//! - Client-side validation (required fields, two or more hobbies, `.docx` resume)
//! - One outstanding submission per form
//! - User listing with resume download
//! - Auto-dismissing notifications
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod constants;
pub mod config;
pub mod error;
pub mod models;
pub mod form;
pub mod listing;
pub mod notify;
pub mod router;
pub mod ui;
pub mod messages;
pub mod app;
pub mod network;

// Re-export commonly used types
pub use config::Config;
pub use error::{TransportError, ValidationError};
pub use models::{Gender, Hobby, Registration, Resume, State, UserRecord};
pub use form::{FormField, RegistrationForm};
pub use router::Route;
pub use messages::{UiEvent, NetworkCommand, NetworkResponse, RenderState};
pub use app::{AppState, AppActor};
pub use network::{ApiClient, NetworkActor};

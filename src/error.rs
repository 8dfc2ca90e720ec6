//! Error taxonomy: client-side validation failures and transport failures.
//!
//! Both kinds are terminal for the operation that raised them. Neither is
//! retried; the app layer turns them into notifications.

use std::path::PathBuf;

use thiserror::Error;

use crate::constants::{MSG_DOCX_ONLY, MSG_REQUIRED_FIELDS, MSG_TWO_HOBBIES};

/// Rejected before any network call is made
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Name, date of birth, gender or resume is empty
    #[error("{}", MSG_REQUIRED_FIELDS)]
    MissingRequired { fields: Vec<&'static str> },

    #[error("{}", MSG_TWO_HOBBIES)]
    TooFewHobbies { selected: usize },

    #[error("Please enter a valid date of birth (YYYY-MM-DD).")]
    InvalidDateOfBirth { input: String },

    #[error("{}", MSG_DOCX_ONLY)]
    UnsupportedResumeType { file_name: String },

    #[error("Resume file not found: {}", .path.display())]
    ResumeNotFound { path: PathBuf },
}

/// Network or server failure
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out")]
    Timeout,

    #[error("server responded with status {status}")]
    Status { status: u16 },

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else if let Some(status) = e.status() {
            TransportError::Status { status: status.as_u16() }
        } else if e.is_decode() {
            TransportError::Decode(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

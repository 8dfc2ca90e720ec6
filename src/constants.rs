//! Application constants
//!
//! Centralized location for endpoint paths, messages and defaults.

use std::time::Duration;

/// Default backend base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:4000";

/// Environment variable that overrides the configured base URL
pub const BASE_URL_ENV: &str = "REGISTRAR_BASE_URL";

/// Endpoint listing every registered user
pub const GET_USERS_PATH: &str = "registration/user/get-user";

/// Endpoint accepting a multipart registration
pub const CREATE_USER_PATH: &str = "registration/user/create";

/// The only accepted resume extension (compared case-insensitively)
pub const RESUME_EXTENSION: &str = "docx";

/// Content type sent for the resume part
pub const RESUME_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// File name used when a resume path has no usable last segment
pub const FALLBACK_RESUME_NAME: &str = "resume.docx";

/// Default overall HTTP timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default log file (relative to the working directory)
pub const DEFAULT_LOG_FILE: &str = "registrar.log";

pub const SUCCESS_TOAST_TTL: Duration = Duration::from_millis(3000);
pub const ERROR_TOAST_TTL: Duration = Duration::from_millis(5000);
pub const INFO_TOAST_TTL: Duration = Duration::from_millis(3000);

// User-facing messages
pub const MSG_REQUIRED_FIELDS: &str = "Please fill out all required fields.";
pub const MSG_TWO_HOBBIES: &str = "Please select at least two hobbies.";
pub const MSG_DOCX_ONLY: &str = "Please upload a .docx file.";
pub const MSG_REGISTERED: &str = "Registration successful!";
pub const MSG_REGISTRATION_FAILED: &str = "Error during registration. Please try again later.";

/// Application name
pub const APP_NAME: &str = "Registrar";

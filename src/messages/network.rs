//! Network messages - communication between App and Network layers

use std::path::PathBuf;

use reqwest::Url;

use crate::error::TransportError;
use crate::models::{Registration, UserRecord};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Fetch the full user collection
    FetchUsers { id: u64 },
    /// POST a validated registration as multipart form data
    SubmitRegistration { id: u64, registration: Registration },
    /// Stream a static resume file to disk
    DownloadResume { id: u64, url: Url, destination: PathBuf },
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug)]
pub enum NetworkResponse {
    UsersFetched {
        id: u64,
        result: Result<Vec<UserRecord>, TransportError>,
    },
    RegistrationSubmitted {
        id: u64,
        result: Result<(), TransportError>,
    },
    ResumeDownloaded {
        id: u64,
        result: Result<PathBuf, TransportError>,
    },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::UsersFetched { id, .. } => *id,
            NetworkResponse::RegistrationSubmitted { id, .. } => *id,
            NetworkResponse::ResumeDownloaded { id, .. } => *id,
        }
    }

    pub fn is_ok(&self) -> bool {
        match self {
            NetworkResponse::UsersFetched { result, .. } => result.is_ok(),
            NetworkResponse::RegistrationSubmitted { result, .. } => result.is_ok(),
            NetworkResponse::ResumeDownloaded { result, .. } => result.is_ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_id_and_status() {
        let fetched = NetworkResponse::UsersFetched { id: 3, result: Ok(Vec::new()) };
        assert_eq!(fetched.id(), 3);
        assert!(fetched.is_ok());

        let submitted = NetworkResponse::RegistrationSubmitted {
            id: 7,
            result: Err(TransportError::Status { status: 500 }),
        };
        assert_eq!(submitted.id(), 7);
        assert!(!submitted.is_ok());

        let downloaded = NetworkResponse::ResumeDownloaded { id: 9, result: Err(TransportError::Timeout) };
        assert_eq!(downloaded.id(), 9);
    }
}

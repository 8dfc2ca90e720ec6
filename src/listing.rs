//! User listing screen state

use std::collections::HashMap;

use reqwest::Url;

use crate::error::TransportError;
use crate::models::UserRecord;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ListingStatus {
    /// Never mounted
    #[default]
    Idle,
    Loading { request_id: u64 },
    Loaded,
    Failed,
}

/// A download in flight
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingDownload {
    pub user_name: String,
    pub file_name: String,
}

#[derive(Clone, Debug, Default)]
pub struct UserListing {
    pub users: Vec<UserRecord>,
    pub status: ListingStatus,
    pub selected: usize,
    downloads: HashMap<u64, PendingDownload>,
}

impl UserListing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, ListingStatus::Loading { .. })
    }

    /// Start a fresh fetch; rows from a previous mount are dropped
    pub fn mount(&mut self, request_id: u64) {
        self.users.clear();
        self.selected = 0;
        self.status = ListingStatus::Loading { request_id };
    }

    /// Settle the fetch. Returns `None` for a response to a superseded fetch.
    pub fn finish_fetch(
        &mut self,
        request_id: u64,
        result: Result<Vec<UserRecord>, TransportError>,
    ) -> Option<Result<usize, TransportError>> {
        if self.status != (ListingStatus::Loading { request_id }) {
            return None;
        }
        match result {
            Ok(users) => {
                let count = users.len();
                self.users = users;
                self.selected = 0;
                self.status = ListingStatus::Loaded;
                Some(Ok(count))
            }
            Err(e) => {
                self.status = ListingStatus::Failed;
                Some(Err(e))
            }
        }
    }

    pub fn select_next(&mut self) {
        if !self.users.is_empty() {
            self.selected = (self.selected + 1) % self.users.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.users.is_empty() {
            self.selected = self.selected
                .checked_sub(1)
                .unwrap_or(self.users.len() - 1);
        }
    }

    pub fn selected_user(&self) -> Option<&UserRecord> {
        self.users.get(self.selected)
    }

    pub fn track_download(&mut self, request_id: u64, download: PendingDownload) {
        self.downloads.insert(request_id, download);
    }

    pub fn finish_download(&mut self, request_id: u64) -> Option<PendingDownload> {
        self.downloads.remove(&request_id)
    }

    pub fn downloads_in_flight(&self) -> usize {
        self.downloads.len()
    }
}

/// Direct URL of a stored resume: the server serves them as static files
pub fn resume_url(base_url: &Url, resume_path: &str) -> Option<Url> {
    let relative = resume_path.trim().trim_start_matches('/').replace('\\', "/");
    if relative.is_empty() {
        return None;
    }
    base_url.join(&relative).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> UserRecord {
        UserRecord { name: name.into(), ..Default::default() }
    }

    #[test]
    fn test_loading_until_settled_on_success() {
        let mut listing = UserListing::new();
        listing.mount(1);
        assert!(listing.is_loading());

        let settled = listing.finish_fetch(1, Ok(vec![user("Ana"), user("Raj")]));
        assert!(matches!(settled, Some(Ok(2))));
        assert!(!listing.is_loading());
        assert_eq!(listing.status, ListingStatus::Loaded);
    }

    #[test]
    fn test_loading_until_settled_on_failure() {
        let mut listing = UserListing::new();
        listing.mount(1);

        let settled = listing.finish_fetch(1, Err(TransportError::Timeout));
        assert!(matches!(settled, Some(Err(TransportError::Timeout))));
        assert!(!listing.is_loading());
        assert!(listing.users.is_empty());
    }

    #[test]
    fn test_superseded_fetch_is_ignored() {
        let mut listing = UserListing::new();
        listing.mount(1);
        listing.mount(2);

        assert!(listing.finish_fetch(1, Ok(vec![user("old")])).is_none());
        assert!(listing.is_loading());
        assert!(listing.finish_fetch(2, Ok(vec![user("new")])).is_some());
        assert_eq!(listing.users[0].name, "new");
    }

    #[test]
    fn test_selection_wraps() {
        let mut listing = UserListing::new();
        listing.mount(1);
        listing.finish_fetch(1, Ok(vec![user("a"), user("b"), user("c")]));

        listing.select_prev();
        assert_eq!(listing.selected_user().unwrap().name, "c");
        listing.select_next();
        assert_eq!(listing.selected_user().unwrap().name, "a");
    }

    #[test]
    fn test_resume_url() {
        let base = Url::parse("http://localhost:4000/").unwrap();
        assert_eq!(
            resume_url(&base, "uploads/ana.docx").unwrap().as_str(),
            "http://localhost:4000/uploads/ana.docx"
        );
        assert_eq!(
            resume_url(&base, "/uploads\\ana.docx").unwrap().as_str(),
            "http://localhost:4000/uploads/ana.docx"
        );
        assert!(resume_url(&base, "  ").is_none());

        let prefixed = Url::parse("https://example.com/api/").unwrap();
        assert_eq!(
            resume_url(&prefixed, "uploads/x.docx").unwrap().as_str(),
            "https://example.com/api/uploads/x.docx"
        );
    }
}

//! Command handlers - business logic for processing UI events

use std::time::Instant;

use chrono::NaiveDate;

use crate::app::AppState;
use crate::constants::{MSG_REGISTERED, MSG_REGISTRATION_FAILED};
use crate::form::{FormField, SubmitOutcome, SubmitRejected};
use crate::listing::{resume_url, PendingDownload};
use crate::messages::ui_events::InputMode;
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::Hobby;
use crate::router::Route;

impl AppState {
    // ========================
    // Routing
    // ========================

    /// Switch route; entering the listing mounts it
    pub fn navigate(&mut self, route: Route) -> Option<NetworkCommand> {
        if self.input_mode == InputMode::Editing {
            self.stop_editing();
        }
        if self.route == route {
            return None;
        }
        self.route = route;
        self.mount_current()
    }

    /// Run the mount side effects of the current route
    pub fn mount_current(&mut self) -> Option<NetworkCommand> {
        match self.route {
            Route::Users => {
                let id = self.next_id();
                self.listing.mount(id);
                tracing::info!(id, "Fetching registered users");
                Some(NetworkCommand::FetchUsers { id })
            }
            Route::Register => None,
        }
    }

    // ========================
    // Field focus
    // ========================

    pub fn next_field(&mut self) {
        if self.input_mode == InputMode::Editing {
            self.stop_editing();
        }
        self.focused_field = self.focused_field.next();
    }

    pub fn prev_field(&mut self) {
        if self.input_mode == InputMode::Editing {
            self.stop_editing();
        }
        self.focused_field = self.focused_field.prev();
    }

    // ========================
    // Text editing
    // ========================

    pub fn start_editing(&mut self) {
        if self.form.is_submitting() || !self.focused_field.is_text() {
            return;
        }
        self.input_mode = InputMode::Editing;
        self.cursor_position = self.current_input().len();
    }

    /// Leave editing mode; leaving the file input commits the selection
    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
        if self.focused_field == FormField::Resume {
            if let Err(e) = self.form.commit_resume_input() {
                tracing::warn!(error = ?e, "Resume selection rejected");
                self.notifications.error(e.to_string());
            }
            self.cursor_position = self.form.resume_input.len();
        }
    }

    pub fn move_cursor_left(&mut self) {
        let input = self.current_input();
        if self.cursor_position > 0 {
            let new_pos = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let input = self.current_input();
        if self.cursor_position < input.len() {
            let new_pos = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
            self.cursor_position = new_pos;
        }
    }

    pub fn enter_char(&mut self, c: char) {
        if self.input_mode != InputMode::Editing {
            return;
        }
        let cursor_pos = self.cursor_position;
        if let Some(input) = self.form.text_mut(self.focused_field) {
            if cursor_pos <= input.len() {
                input.insert(cursor_pos, c);
                self.cursor_position = cursor_pos + c.len_utf8();
            }
        }
    }

    pub fn delete_char(&mut self) {
        if self.input_mode != InputMode::Editing || self.cursor_position == 0 {
            return;
        }
        let cursor_pos = self.cursor_position;
        if let Some(input) = self.form.text_mut(self.focused_field) {
            let prev_pos = input[..cursor_pos]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            input.remove(prev_pos);
            self.cursor_position = prev_pos;
        }
    }

    // ========================
    // Choice fields
    // ========================

    pub fn option_next(&mut self) {
        self.step_option(true);
    }

    pub fn option_prev(&mut self) {
        self.step_option(false);
    }

    fn step_option(&mut self, forward: bool) {
        if self.form.is_submitting() {
            return;
        }
        match self.focused_field {
            FormField::Gender => self.form.cycle_gender(forward),
            FormField::State => self.form.cycle_state(forward),
            FormField::Hobbies => {
                let len = Hobby::ALL.len();
                self.hobby_cursor = if forward {
                    (self.hobby_cursor + 1) % len
                } else {
                    (self.hobby_cursor + len - 1) % len
                };
            }
            _ => {}
        }
    }

    /// Space/Enter on a choice field
    pub fn toggle_option(&mut self) {
        if self.form.is_submitting() {
            return;
        }
        match self.focused_field {
            FormField::Hobbies => {
                if let Some(hobby) = Hobby::ALL.get(self.hobby_cursor) {
                    self.form.toggle_hobby(*hobby);
                }
            }
            FormField::Gender => self.form.cycle_gender(true),
            FormField::State => self.form.cycle_state(true),
            _ => {}
        }
    }

    // ========================
    // Submit / reset
    // ========================

    /// Validate and build the POST; a rejected submit sends nothing
    pub fn submit(&mut self, today: NaiveDate) -> Option<NetworkCommand> {
        if self.route != Route::Register {
            return None;
        }
        if self.input_mode == InputMode::Editing {
            self.stop_editing();
        }

        let id = self.next_id();
        match self.form.begin_submit(id, today) {
            Ok(registration) => {
                tracing::info!(id, name = %registration.name, "Submitting registration");
                Some(NetworkCommand::SubmitRegistration { id, registration })
            }
            Err(SubmitRejected::Invalid(e)) => {
                tracing::warn!(error = ?e, "Registration rejected by validation");
                self.notifications.error(e.to_string());
                None
            }
            Err(SubmitRejected::InFlight) => {
                self.notifications.info(SubmitRejected::InFlight.to_string());
                None
            }
        }
    }

    pub fn reset_form(&mut self) {
        if !self.form.reset() {
            self.notifications.info("Wait for the current submission to finish.");
            return;
        }
        self.focused_field = FormField::Name;
        self.hobby_cursor = 0;
        self.input_mode = InputMode::Normal;
        self.cursor_position = 0;
    }

    // ========================
    // Listing
    // ========================

    pub fn refresh_users(&mut self) -> Option<NetworkCommand> {
        if self.route != Route::Users || self.listing.is_loading() {
            return None;
        }
        self.mount_current()
    }

    pub fn next_user(&mut self) {
        self.listing.select_next();
    }

    pub fn prev_user(&mut self) {
        self.listing.select_prev();
    }

    pub fn download_resume(&mut self) -> Option<NetworkCommand> {
        let user = self.listing.selected_user()?.clone();

        let Some(url) = resume_url(&self.base_url, &user.resume_path) else {
            self.notifications.info(format!("No resume on file for {}.", user.name));
            return None;
        };

        let file_name = user.resume_file_name();
        let destination = self.download_dir.join(&file_name);
        let id = self.next_id();
        self.listing.track_download(
            id,
            PendingDownload {
                user_name: user.name.clone(),
                file_name,
            },
        );
        tracing::info!(id, url = %url, "Downloading resume");
        Some(NetworkCommand::DownloadResume { id, url, destination })
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Notifications
    // ========================

    /// Drop expired notifications; returns true if a redraw is needed
    pub fn tick(&mut self, now: Instant) -> bool {
        self.notifications.prune(now)
    }

    // ========================
    // Response handling
    // ========================

    pub fn handle_response(&mut self, response: NetworkResponse) {
        tracing::debug!(id = response.id(), ok = response.is_ok(), "Network response");
        match response {
            NetworkResponse::UsersFetched { id, result } => {
                match self.listing.finish_fetch(id, result) {
                    Some(Ok(count)) => tracing::info!(id, count, "Users loaded"),
                    Some(Err(e)) => {
                        tracing::error!(id, error = %e, "Fetching users failed");
                        self.notifications.error(format!("Could not load users: {}", e));
                    }
                    None => tracing::debug!(id, "Ignoring superseded user fetch"),
                }
            }
            NetworkResponse::RegistrationSubmitted { id, result } => {
                match self.form.finish_submit(id, &result) {
                    Some(SubmitOutcome::Registered) => {
                        tracing::info!(id, "Registration accepted");
                        self.focused_field = FormField::Name;
                        self.hobby_cursor = 0;
                        self.input_mode = InputMode::Normal;
                        self.cursor_position = 0;
                        self.notifications.success(MSG_REGISTERED);
                    }
                    Some(SubmitOutcome::Failed) => {
                        if let Err(e) = &result {
                            tracing::error!(id, error = %e, "Registration failed");
                        }
                        self.notifications.error(MSG_REGISTRATION_FAILED);
                    }
                    None => tracing::debug!(id, "Ignoring stale submission outcome"),
                }
            }
            NetworkResponse::ResumeDownloaded { id, result } => {
                let Some(download) = self.listing.finish_download(id) else {
                    return;
                };
                match result {
                    Ok(path) => {
                        tracing::info!(id, path = %path.display(), "Resume saved");
                        self.notifications.success(format!(
                            "Saved {}'s resume to {}",
                            download.user_name,
                            path.display()
                        ));
                    }
                    Err(e) => {
                        tracing::error!(id, error = %e, "Resume download failed");
                        self.notifications.error(format!(
                            "Could not download {}: {}",
                            download.file_name, e
                        ));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use std::time::Duration;

    use reqwest::Url;

    use crate::config::Config;
    use crate::constants::{MSG_DOCX_ONLY, MSG_REQUIRED_FIELDS, MSG_TWO_HOBBIES};
    use crate::error::TransportError;
    use crate::form::RegistrationForm;
    use crate::models::{Gender, UserRecord};
    use crate::notify::Level;

    fn config(download_dir: PathBuf) -> Config {
        Config {
            base_url: Url::parse("http://localhost:4000/").unwrap(),
            download_dir,
            log_file: PathBuf::from("test.log"),
            request_timeout: Duration::from_secs(5),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn type_text(state: &mut AppState, field: FormField, text: &str) {
        state.focused_field = field;
        state.start_editing();
        for c in text.chars() {
            state.enter_char(c);
        }
        state.stop_editing();
    }

    /// Fill the form the way a user would, through UI commands
    fn fill(state: &mut AppState, dir: &tempfile::TempDir) {
        let resume = dir.path().join("ana.docx");
        fs::write(&resume, b"PK\x03\x04").unwrap();

        type_text(state, FormField::Name, "Ana");
        type_text(state, FormField::Dob, "2000-01-01");
        state.focused_field = FormField::Gender;
        state.toggle_option();
        state.focused_field = FormField::Hobbies;
        state.toggle_option(); // Reading
        state.option_next();
        state.option_next();
        state.option_next();
        state.toggle_option(); // Cycling
        type_text(state, FormField::Resume, resume.to_str().unwrap());
    }

    #[test]
    fn test_empty_submit_sends_nothing_and_notifies() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(&config(dir.path().to_path_buf()), Route::Register);

        assert!(state.submit(today()).is_none());
        let latest = state.notifications.latest().unwrap();
        assert_eq!(latest.level, Level::Error);
        assert_eq!(latest.message, MSG_REQUIRED_FIELDS);
        assert!(!state.form.is_submitting());
    }

    #[test]
    fn test_one_hobby_submit_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(&config(dir.path().to_path_buf()), Route::Register);
        fill(&mut state, &dir);
        state.form.toggle_hobby(Hobby::Cycling);

        assert!(state.submit(today()).is_none());
        assert_eq!(state.notifications.latest().unwrap().message, MSG_TWO_HOBBIES);
    }

    #[test]
    fn test_full_submission_round() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(&config(dir.path().to_path_buf()), Route::Register);
        fill(&mut state, &dir);

        let cmd = state.submit(today()).expect("valid form should submit");
        let NetworkCommand::SubmitRegistration { id, registration } = cmd else {
            panic!("expected a submission command");
        };
        assert_eq!(registration.name, "Ana");
        assert_eq!(registration.gender, Gender::Female);
        assert_eq!(registration.hobbies_field(), "Reading,Cycling");

        // Double submit while outstanding issues nothing
        assert!(state.submit(today()).is_none());

        state.handle_response(NetworkResponse::RegistrationSubmitted { id, result: Ok(()) });
        assert_eq!(state.form, RegistrationForm::new());
        let latest = state.notifications.latest().unwrap();
        assert_eq!(latest.level, Level::Success);
        assert_eq!(latest.message, MSG_REGISTERED);
    }

    #[test]
    fn test_failed_submission_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(&config(dir.path().to_path_buf()), Route::Register);
        fill(&mut state, &dir);

        let Some(NetworkCommand::SubmitRegistration { id, .. }) = state.submit(today()) else {
            panic!("expected a submission command");
        };
        state.handle_response(NetworkResponse::RegistrationSubmitted {
            id,
            result: Err(TransportError::Status { status: 500 }),
        });

        assert_eq!(state.form.name, "Ana");
        assert!(!state.form.is_submitting());
        assert_eq!(state.notifications.latest().unwrap().message, MSG_REGISTRATION_FAILED);
        assert!(state.submit(today()).is_some());
    }

    #[test]
    fn test_disallowed_resume_notifies_and_keeps_stored_resume() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(&config(dir.path().to_path_buf()), Route::Register);
        fill(&mut state, &dir);
        let stored = state.form.resume.clone();

        let pdf = dir.path().join("cv.pdf");
        fs::write(&pdf, b"%PDF").unwrap();
        state.focused_field = FormField::Resume;
        state.start_editing();
        state.form.resume_input = pdf.to_string_lossy().to_string();
        state.stop_editing();

        assert_eq!(state.form.resume, stored);
        assert!(state.form.resume_input.is_empty());
        assert_eq!(state.notifications.latest().unwrap().message, MSG_DOCX_ONLY);
    }

    #[test]
    fn test_form_locked_while_submitting() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(&config(dir.path().to_path_buf()), Route::Register);
        fill(&mut state, &dir);
        state.submit(today()).unwrap();

        let hobbies = state.form.hobbies.clone();
        state.focused_field = FormField::Hobbies;
        state.toggle_option();
        assert_eq!(state.form.hobbies, hobbies);

        state.focused_field = FormField::Name;
        state.start_editing();
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_navigating_to_listing_mounts_it() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(&config(dir.path().to_path_buf()), Route::Register);

        let Some(NetworkCommand::FetchUsers { id }) = state.navigate(Route::Users) else {
            panic!("expected a fetch");
        };
        assert!(state.listing.is_loading());
        assert!(state.navigate(Route::Users).is_none());
        assert!(state.refresh_users().is_none());

        state.handle_response(NetworkResponse::UsersFetched {
            id,
            result: Err(TransportError::Connect("refused".into())),
        });
        assert!(!state.listing.is_loading());
        assert_eq!(state.notifications.latest().unwrap().level, Level::Error);

        // Re-entering re-fetches
        state.navigate(Route::Register);
        assert!(matches!(state.navigate(Route::Users), Some(NetworkCommand::FetchUsers { .. })));
    }

    #[test]
    fn test_download_builds_static_url() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(&config(dir.path().to_path_buf()), Route::Users);
        let Some(NetworkCommand::FetchUsers { id }) = state.mount_current() else {
            panic!("expected a fetch");
        };
        state.handle_response(NetworkResponse::UsersFetched {
            id,
            result: Ok(vec![
                UserRecord { name: "Ana".into(), resume_path: "uploads/ana.docx".into(), ..Default::default() },
                UserRecord { name: "Raj".into(), ..Default::default() },
            ]),
        });

        let Some(NetworkCommand::DownloadResume { id, url, destination }) = state.download_resume() else {
            panic!("expected a download");
        };
        assert_eq!(url.as_str(), "http://localhost:4000/uploads/ana.docx");
        assert_eq!(destination, dir.path().join("ana.docx"));
        assert_eq!(state.listing.downloads_in_flight(), 1);

        state.handle_response(NetworkResponse::ResumeDownloaded { id, result: Ok(destination) });
        assert_eq!(state.listing.downloads_in_flight(), 0);
        assert_eq!(state.notifications.latest().unwrap().level, Level::Success);

        state.next_user();
        assert!(state.download_resume().is_none());
        assert_eq!(state.notifications.latest().unwrap().level, Level::Info);
    }

    #[test]
    fn test_tick_prunes_expired_notifications() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(&config(dir.path().to_path_buf()), Route::Register);
        state.submit(today());
        assert!(!state.tick(Instant::now()));
        assert!(state.tick(Instant::now() + Duration::from_secs(10)));
        assert!(state.notifications.is_empty());
    }

    #[test]
    fn test_reset_clears_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(&config(dir.path().to_path_buf()), Route::Register);
        fill(&mut state, &dir);
        state.reset_form();
        assert_eq!(state.form, RegistrationForm::new());
        assert_eq!(state.focused_field, FormField::Name);
    }

    #[test]
    fn test_utf8_editing() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(&config(dir.path().to_path_buf()), Route::Register);
        state.start_editing();
        for c in "Zoë".chars() {
            state.enter_char(c);
        }
        state.move_cursor_left();
        state.delete_char();
        assert_eq!(state.form.name, "Zë");
        state.move_cursor_right();
        state.enter_char('!');
        assert_eq!(state.form.name, "Zë!");
    }
}

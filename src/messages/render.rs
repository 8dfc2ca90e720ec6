//! Render state - data structure sent from App layer to UI for rendering

use crate::form::{FormField, RegistrationForm};
use crate::listing::ListingStatus;
use crate::messages::ui_events::InputMode;
use crate::models::UserRecord;
use crate::notify::Notification;
use crate::router::Route;

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    pub route: Route,
    pub base_url: String,

    // Registration form
    pub form: RegistrationForm,
    pub focused_field: FormField,
    pub hobby_cursor: usize,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub is_submitting: bool,

    // User listing
    pub users: Vec<UserRecord>,
    pub listing_status: ListingStatus,
    pub selected_user: usize,
    pub downloads_in_flight: usize,

    // Notification area (newest first)
    pub notifications: Vec<Notification>,

    // Popups
    pub show_help: bool,
}

impl RenderState {
    /// Terminal column of the edit cursor: characters before the byte offset
    pub fn cursor_column(&self) -> usize {
        let input = self.form.text(self.focused_field).unwrap_or("");
        input
            .get(..self.cursor_position)
            .map(|before| before.chars().count())
            .unwrap_or_else(|| input.chars().count())
    }
}

impl Default for RenderState {
    fn default() -> Self {
        use crate::constants::DEFAULT_BASE_URL;
        RenderState {
            route: Route::Register,
            base_url: String::from(DEFAULT_BASE_URL),
            form: RegistrationForm::new(),
            focused_field: FormField::Name,
            hobby_cursor: 0,
            input_mode: InputMode::Normal,
            cursor_position: 0,
            is_submitting: false,
            users: Vec::new(),
            listing_status: ListingStatus::Idle,
            selected_user: 0,
            downloads_in_flight: 0,
            notifications: Vec::new(),
            show_help: false,
        }
    }
}

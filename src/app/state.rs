//! App state - pure data structure with no I/O logic

use std::path::PathBuf;

use reqwest::Url;

use crate::config::Config;
use crate::form::{FormField, RegistrationForm};
use crate::listing::UserListing;
use crate::messages::ui_events::InputMode;
use crate::messages::RenderState;
use crate::notify::Notifications;
use crate::router::Route;

/// Main application state - pure data, no I/O
pub struct AppState {
    // Routing
    pub route: Route,

    // Configuration
    pub base_url: Url,
    pub download_dir: PathBuf,

    // Registration form
    pub form: RegistrationForm,
    pub focused_field: FormField,
    pub hobby_cursor: usize,
    pub input_mode: InputMode,
    pub cursor_position: usize,

    // User listing
    pub listing: UserListing,

    // Global notification area
    pub notifications: Notifications,

    // Popups
    pub show_help: bool,

    pub next_request_id: u64,
}

impl AppState {
    pub fn new(config: &Config, route: Route) -> Self {
        AppState {
            route,
            base_url: config.base_url.clone(),
            download_dir: config.download_dir.clone(),
            form: RegistrationForm::new(),
            focused_field: FormField::Name,
            hobby_cursor: 0,
            input_mode: InputMode::Normal,
            cursor_position: 0,
            listing: UserListing::new(),
            notifications: Notifications::new(),
            show_help: false,
            next_request_id: 1,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Text of the focused field, empty for choice fields
    pub fn current_input(&self) -> &str {
        self.form.text(self.focused_field).unwrap_or("")
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            route: self.route,
            base_url: self.base_url.to_string(),
            form: self.form.clone(),
            focused_field: self.focused_field,
            hobby_cursor: self.hobby_cursor,
            input_mode: self.input_mode,
            cursor_position: self.cursor_position,
            is_submitting: self.form.is_submitting(),
            users: self.listing.users.clone(),
            listing_status: self.listing.status,
            selected_user: self.listing.selected,
            downloads_in_flight: self.listing.downloads_in_flight(),
            notifications: self.notifications.visible(),
            show_help: self.show_help,
        }
    }
}

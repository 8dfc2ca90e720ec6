//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::form::FormField;
use crate::router::Route;

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Routing
    Navigate(Route),

    // Form field focus
    NextField,
    PrevField,

    // Text editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,

    // Choice fields (gender, hobbies, state)
    OptionNext,
    OptionPrev,
    ToggleOption,

    // Form actions
    Submit,
    ResetForm,

    // Listing
    NextUser,
    PrevUser,
    DownloadResume,
    RefreshUsers,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    route: Route,
    focused: FormField,
    input_mode: InputMode,
    show_help: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return Some(UiEvent::Quit),
            KeyCode::Char('s') if route == Route::Register => return Some(UiEvent::Submit),
            _ => {}
        }
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    // Route switching (only in normal mode, not editing)
    if input_mode == InputMode::Normal {
        match key.code {
            KeyCode::Char('1') => return Some(UiEvent::Navigate(Route::Register)),
            KeyCode::Char('2') => return Some(UiEvent::Navigate(Route::Users)),
            _ => {}
        }
    }

    match route {
        Route::Register => handle_form_keys(key, focused, input_mode),
        Route::Users => handle_listing_keys(key),
    }
}

/// Handle keys for the registration form
fn handle_form_keys(key: KeyEvent, focused: FormField, input_mode: InputMode) -> Option<UiEvent> {
    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Char('u') => Some(UiEvent::Navigate(Route::Users)),
            KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::NextField),
            KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::PrevField),
            KeyCode::Right | KeyCode::Char('l') => Some(UiEvent::OptionNext),
            KeyCode::Left | KeyCode::Char('h') => Some(UiEvent::OptionPrev),
            KeyCode::Char('e') | KeyCode::Enter if focused.is_text() => Some(UiEvent::StartEditing),
            KeyCode::Char(' ') | KeyCode::Enter => Some(UiEvent::ToggleOption),
            KeyCode::Char('s') => Some(UiEvent::Submit),
            KeyCode::Char('r') => Some(UiEvent::ResetForm),
            _ => None,
        },
        InputMode::Editing => match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(UiEvent::StopEditing),
            KeyCode::Tab => Some(UiEvent::NextField),
            KeyCode::BackTab => Some(UiEvent::PrevField),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
    }
}

/// Handle keys for the user listing
fn handle_listing_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Esc | KeyCode::Char('b') => Some(UiEvent::Navigate(Route::Register)),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::NextUser),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::PrevUser),
        KeyCode::Char('d') | KeyCode::Enter => Some(UiEvent::DownloadResume),
        KeyCode::Char('r') => Some(UiEvent::RefreshUsers),
        _ => None,
    }
}

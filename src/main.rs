//! Registrar TUI - Actor-based registration client
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async HTTP execution
//!
//! Usage: `registrar [/ | /display]` picks the starting screen.

use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::*,
};
use tokio::sync::mpsc;

use registrar_tui::constants::{APP_NAME, DEFAULT_LOG_FILE, RESUME_EXTENSION};
use registrar_tui::form::FormField;
use registrar_tui::listing::ListingStatus;
use registrar_tui::messages::ui_events::{key_to_ui_event, InputMode};
use registrar_tui::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use registrar_tui::models::{Gender, Hobby, State};
use registrar_tui::ui::{self, level_color, option_span, render_field, row_style};
use registrar_tui::{ApiClient, AppActor, Config, NetworkActor, Route};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    // Initialize logging to file; the terminal belongs to the UI
    let log_dir = config.log_file.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let log_name = config.log_file.file_name().unwrap_or_else(|| OsStr::new(DEFAULT_LOG_FILE));
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let start_route = std::env::args()
        .nth(1)
        .map(|path| Route::from_path(&path))
        .unwrap_or_default();
    tracing::info!(base_url = %config.base_url, route = start_route.path(), "Starting");

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _terminal_guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(ApiClient::new(&config), net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(&config, start_route, net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    tracing::info!("Exiting");
    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.route,
                    current_state.focused_field,
                    current_state.input_mode,
                    current_state.show_help,
                ) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // Route bar
            Constraint::Min(0),     // Content
            Constraint::Length(1),  // Status bar
        ])
        .split(area);

    draw_route_bar(f, state, main_chunks[0]);

    match state.route {
        Route::Register => draw_form(f, state, main_chunks[1]),
        Route::Users => draw_users(f, state, main_chunks[1]),
    }

    draw_status_bar(f, state, main_chunks[2]);

    // Overlays
    draw_notifications(f, state, area);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_route_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(40)])
        .split(area);

    let titles = [Route::Register.title(), Route::Users.title()];
    let selected = match state.route {
        Route::Register => 0,
        Route::Users => 1,
    };
    f.render_widget(ui::render_tabs(&titles, selected), chunks[0]);

    let server = Paragraph::new(format!("{} @ {}", APP_NAME, state.base_url))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Right);
    f.render_widget(server, chunks[1]);
}

fn draw_form(f: &mut Frame, state: &RenderState, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Name + DOB
            Constraint::Length(3),  // Gender
            Constraint::Length(3),  // Hobbies
            Constraint::Length(3),  // State
            Constraint::Length(4),  // Address
            Constraint::Length(4),  // Resume
            Constraint::Min(0),
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    let form = &state.form;
    let editing = state.input_mode == InputMode::Editing;
    let focus = |field: FormField| state.focused_field == field;

    f.render_widget(render_field(form.name.as_str(), " Name ", focus(FormField::Name), editing), top[0]);
    f.render_widget(
        render_field(form.dob.as_str(), " Date Of Birth (YYYY-MM-DD) ", focus(FormField::Dob), editing),
        top[1],
    );

    let genders: Vec<Span> = Gender::ALL
        .iter()
        .map(|g| option_span(g.as_str(), form.gender == Some(*g), false, true))
        .collect();
    f.render_widget(
        render_field(Line::from(genders), " Gender (←/→) ", focus(FormField::Gender), false),
        rows[1],
    );

    let hobbies: Vec<Span> = Hobby::ALL
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let under_cursor = focus(FormField::Hobbies) && i == state.hobby_cursor;
            option_span(h.as_str(), form.has_hobby(*h), under_cursor, false)
        })
        .collect();
    f.render_widget(
        render_field(Line::from(hobbies), " Hobbies (pick two or more, space toggles) ", focus(FormField::Hobbies), false),
        rows[2],
    );

    let states: Vec<Span> = State::ALL
        .iter()
        .map(|s| option_span(s.as_str(), form.state == Some(*s), false, true))
        .collect();
    f.render_widget(
        render_field(Line::from(states), " State (←/→) ", focus(FormField::State), false),
        rows[3],
    );

    f.render_widget(
        render_field(form.address.as_str(), " Address ", focus(FormField::Address), editing)
            .wrap(Wrap { trim: false }),
        rows[4],
    );

    let selected = match &form.resume {
        Some(resume) => Line::from(Span::styled(
            format!("Selected: {}", resume.file_name),
            Style::default().fg(Color::Green),
        )),
        None => Line::from(Span::styled(
            format!("Only .{} files allowed", RESUME_EXTENSION),
            Style::default().fg(Color::DarkGray),
        )),
    };
    let resume_text = Text::from(vec![Line::from(form.resume_input.as_str()), selected]);
    f.render_widget(
        render_field(resume_text, " Upload resume (path) ", focus(FormField::Resume), editing),
        rows[5],
    );

    let actions = if state.is_submitting {
        Line::from(Span::styled(" Submitting... ", Style::default().fg(Color::Yellow).bold()))
    } else {
        Line::from(vec![
            Span::styled(" [s] Submit form ", Style::default().fg(Color::Black).bg(Color::Yellow).bold()),
            Span::raw("  "),
            Span::styled(" [r] Reset all ", Style::default().fg(Color::Black).bg(Color::Gray)),
            Span::raw("  "),
            Span::styled(" [2] Display all users ", Style::default().fg(Color::White).bg(Color::DarkGray)),
        ])
    };
    f.render_widget(Paragraph::new(actions), rows[6]);

    // Cursor
    if editing && state.focused_field.is_text() {
        let field_area = match state.focused_field {
            FormField::Name => top[0],
            FormField::Dob => top[1],
            FormField::Address => rows[4],
            _ => rows[5],
        };
        let max_x = field_area.x + field_area.width.saturating_sub(2);
        let cursor_x = (field_area.x + state.cursor_column() as u16 + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, field_area.y + 1));
    }
}

fn draw_users(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", Route::Users.title().to_uppercase()));

    let placeholder = match state.listing_status {
        ListingStatus::Loading { .. } | ListingStatus::Idle => Some("Loading users..."),
        ListingStatus::Failed if state.users.is_empty() => Some("Could not load users. Press 'r' to retry."),
        ListingStatus::Loaded if state.users.is_empty() => Some("No users registered yet."),
        _ => None,
    };
    if let Some(text) = placeholder {
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(["Name", "DOB", "Gender", "Hobbies", "State", "Address", "Resume"])
        .style(Style::default().fg(Color::Yellow).bold())
        .bottom_margin(1);

    let rows: Vec<Row> = state
        .users
        .iter()
        .enumerate()
        .map(|(i, user)| {
            let resume = if user.resume_path.is_empty() { "-" } else { "[d] Download" };
            Row::new(vec![
                Cell::from(user.name.clone()),
                Cell::from(user.dob.clone()),
                Cell::from(user.gender.clone()),
                Cell::from(user.hobbies.clone()),
                Cell::from(user.state.clone()),
                Cell::from(user.address.clone()),
                Cell::from(resume),
            ])
            .style(row_style(i, i == state.selected_user))
        })
        .collect();

    let widths = [
        Constraint::Percentage(16),
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Percentage(20),
        Constraint::Percentage(14),
        Constraint::Percentage(22),
        Constraint::Length(14),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);

    let mut table_state = TableState::default().with_selected(Some(state.selected_user));
    f.render_stateful_widget(table, area, &mut table_state);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let status = match state.route {
        _ if state.is_submitting && state.route == Route::Register => " Submitting registration... ".to_string(),
        Route::Register if state.input_mode == InputMode::Editing => {
            " ESC/Enter:stop editing | arrows:move | Tab:next field | Ctrl+S:submit ".to_string()
        }
        Route::Register => " Tab:field | e:edit | ←/→:choose | space:toggle | s:submit | r:reset | 2:users | ?:help | q:quit ".to_string(),
        Route::Users if state.downloads_in_flight > 0 => {
            format!(" Downloading {} resume(s)... ", state.downloads_in_flight)
        }
        Route::Users => " ↑/↓:select | d:download resume | r:refresh | 1:form | ?:help | q:quit ".to_string(),
    };

    let bar = Paragraph::new(status)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_notifications(f: &mut Frame, state: &RenderState, area: Rect) {
    let width = (area.width / 2).clamp(20, 60).min(area.width);
    let mut y = area.y + 1;

    for note in &state.notifications {
        if y + 3 > area.y + area.height {
            break;
        }
        let rect = Rect::new(area.x + area.width - width, y, width, 3);
        let color = level_color(note.level);
        let toast = Paragraph::new(note.message.as_str())
            .style(Style::default().fg(color))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .style(Style::default().bg(Color::Black)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(toast, rect);
        y += 3;
    }
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 REGISTRAR - Keyboard Shortcuts

 SCREENS
   1                  Registration form
   2 / u              Display all users

 FORM
   Tab / ↓            Next field
   Shift+Tab / ↑      Previous field
   e / Enter          Edit text field (name, date, address, resume path)
   ← / →              Change gender, state or hobby cursor
   Space              Toggle hobby
   s / Ctrl+S         Submit form
   r                  Reset all fields

 USERS
   ↑ / ↓              Select user
   d / Enter          Download resume
   r                  Refresh list
   Esc / b            Back to form

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

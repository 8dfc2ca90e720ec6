use ratatui::{prelude::*, widgets::*};

use crate::notify::Level;

/// Renders tabs
pub fn render_tabs<'a>(titles: &[&'a str], selected: usize) -> Tabs<'a> {
    let titles: Vec<Line> = titles.iter().map(|t| Line::from(*t)).collect();

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .divider("|")
}

/// Border color of a form field
pub fn field_border_style(is_focused: bool, is_editing: bool) -> Style {
    if is_focused && is_editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

/// Renders a bordered single-value field
pub fn render_field<'a>(
    content: impl Into<Text<'a>>,
    title: &'a str,
    is_focused: bool,
    is_editing: bool,
) -> Paragraph<'a> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(field_border_style(is_focused, is_editing))
        .title(title);

    Paragraph::new(content).block(block)
}

/// Inline option marker for radio groups and checkboxes
pub fn option_span(label: &str, marked: bool, under_cursor: bool, radio: bool) -> Span<'static> {
    let marker = match (radio, marked) {
        (true, true) => "(*)",
        (true, false) => "( )",
        (false, true) => "[x]",
        (false, false) => "[ ]",
    };
    let style = if under_cursor {
        Style::default().fg(Color::Yellow).bold()
    } else if marked {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };
    Span::styled(format!("{} {}  ", marker, label), style)
}

/// Notification color
pub fn level_color(level: Level) -> Color {
    match level {
        Level::Success => Color::Green,
        Level::Error => Color::Red,
        Level::Info => Color::Cyan,
    }
}

/// Alternating row styles for the user table
pub fn row_style(index: usize, is_selected: bool) -> Style {
    if is_selected {
        return Style::default().fg(Color::Black).bg(Color::Cyan).bold();
    }
    if index % 2 == 0 {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray).bg(Color::Rgb(30, 30, 30))
    }
}

mod detail;

pub use detail::card_height;
mod help;
mod list;
mod loader;
mod not_found;

use crate::app::{App, InputMode, Screen};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Top-level render dispatch.
pub fn render(app: &App, frame: &mut Frame) {
    match &app.screen {
        Screen::List(list) => list::render(app, list, frame),
        Screen::Detail(detail) => detail::render(app, detail, frame),
        Screen::NotFound { path } => not_found::render(app, path, frame),
    }

    if app.show_help {
        help::render(frame);
    }
}

/// Header line with the title and current navigation path.
fn render_header(app: &App, title: &str, frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {}", title),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("   {}", app.route), Style::default().fg(Color::DarkGray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, area);
}

/// Bottom line of key hints followed by the status message.
fn render_status(app: &App, keys: &[(&str, &str)], frame: &mut Frame, area: Rect) {
    if app.input_mode == InputMode::Address {
        let label = " Go to (Enter to navigate, Esc to cancel): ";
        let line = Line::from(vec![
            Span::styled(label, Style::default().fg(Color::Yellow)),
            Span::raw(app.address.as_str()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        let cursor_x = area.x + (label.width() + app.address.width()) as u16;
        frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(1)), area.y));
        return;
    }

    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut spans = Vec::with_capacity(keys.len() * 2 + 1);
    for (key, action) in keys {
        spans.push(Span::styled(format!(" {}", key), key_style));
        spans.push(Span::raw(format!(" {} ", action)));
    }
    spans.push(Span::styled(
        format!(" {}", app.status_msg),
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Error banner block.
fn error_banner(message: &str) -> Paragraph<'_> {
    Paragraph::new(format!(" {}", message))
        .style(Style::default().fg(Color::White).bg(Color::Red))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
}

/// Truncate a string to `max_width` display columns, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        used += w;
        result.push(c);
    }
    result.push('…');
    result
}

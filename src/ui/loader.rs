use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};
use std::time::{SystemTime, UNIX_EPOCH};

const FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];
const FRAME_MS: u128 = 100;

/// Loading indicator centered in `area`.
pub fn render(frame: &mut Frame, area: Rect) {
    let tick = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() / FRAME_MS)
        .unwrap_or(0);
    let glyph = FRAMES[(tick % FRAMES.len() as u128) as usize];

    let height = area.height.min(1);
    let spot = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: area.width,
        height,
    };

    let line = Line::from(vec![
        Span::styled(
            format!("{} ", glyph),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("Loading..."),
    ]);
    frame.render_widget(Clear, spot);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), spot);
}

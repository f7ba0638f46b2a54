use crate::app::App;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::Paragraph,
};

pub fn render(app: &App, path: &str, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    super::render_header(app, "Country Explorer", frame, chunks[0]);

    let text = vec![
        Line::from(""),
        Line::styled(
            "404 - Page not found",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::styled(
            format!("Nothing lives at {}", path),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), chunks[1]);

    super::render_status(app, &[("Enter/Esc", "Home"), (":", "Go to"), ("q", "Quit")], frame, chunks[2]);
}

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub fn render(frame: &mut Frame) {
    let area = centered_rect(70, 70, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let help_text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Global", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("    ?           ", Style::default().fg(Color::Yellow)),
            Span::raw("Toggle this help"),
        ]),
        Line::from(vec![
            Span::styled("    q           ", Style::default().fg(Color::Yellow)),
            Span::raw("Quit application"),
        ]),
        Line::from(vec![
            Span::styled("    :           ", Style::default().fg(Color::Yellow)),
            Span::raw("Go to a path (/, /home, /country-details/<name>)"),
        ]),
        Line::from(vec![
            Span::styled("    r           ", Style::default().fg(Color::Yellow)),
            Span::raw("Reload the current screen"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Countries List", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("    ↑/k ↓/j     ", Style::default().fg(Color::Yellow)),
            Span::raw("Move between countries"),
        ]),
        Line::from(vec![
            Span::styled("    PgUp/PgDn   ", Style::default().fg(Color::Yellow)),
            Span::raw("Move a page up/down"),
        ]),
        Line::from(vec![
            Span::styled("    g/G         ", Style::default().fg(Color::Yellow)),
            Span::raw("Jump to first/last country"),
        ]),
        Line::from(vec![
            Span::styled("    /           ", Style::default().fg(Color::Yellow)),
            Span::raw("Search by country name"),
        ]),
        Line::from(vec![
            Span::styled("    s/S         ", Style::default().fg(Color::Yellow)),
            Span::raw("Cycle sort order forward/back"),
        ]),
        Line::from(vec![
            Span::styled("    Enter       ", Style::default().fg(Color::Yellow)),
            Span::raw("View country details"),
        ]),
        Line::from(vec![
            Span::styled("    o/m         ", Style::default().fg(Color::Yellow)),
            Span::raw("Open Google Maps / OpenStreetMap"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Country Details", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("    ↑/↓         ", Style::default().fg(Color::Yellow)),
            Span::raw("Scroll"),
        ]),
        Line::from(vec![
            Span::styled("    PgUp/PgDn   ", Style::default().fg(Color::Yellow)),
            Span::raw("Scroll page up/down"),
        ]),
        Line::from(vec![
            Span::styled("    Tab         ", Style::default().fg(Color::Yellow)),
            Span::raw("Next record when several match"),
        ]),
        Line::from(vec![
            Span::styled("    o/m         ", Style::default().fg(Color::Yellow)),
            Span::raw("Open Google Maps / OpenStreetMap"),
        ]),
        Line::from(vec![
            Span::styled("    Esc/b       ", Style::default().fg(Color::Yellow)),
            Span::raw("Back to Home (disabled while loading)"),
        ]),
        Line::from(""),
    ];

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help: Keybindings ")
                .title_bottom(Line::from(" Press ? or Esc to close ").style(Style::default().fg(Color::DarkGray))),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(help, area);
}

/// Create a centered rectangle using percentage of parent area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

use crate::app::{App, InputMode, ListScreen};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use unicode_width::UnicodeWidthStr;

pub fn render(app: &App, screen: &ListScreen, frame: &mut Frame) {
    let area = frame.area();

    // Layout: header(2) + search(3) + cards(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    super::render_header(app, "Countries List", frame, chunks[0]);

    // ── Search + sort bar ──
    let editing = app.input_mode == InputMode::Search;
    let bar_style = if editing {
        Style::default().fg(Color::Yellow)
    } else if screen.state.loading {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let search_label = if editing {
        " Search (Enter to apply, Esc to cancel): "
    } else {
        " Search (/): "
    };
    let search_line = Line::from(vec![
        Span::raw(search_label),
        Span::styled(&screen.search, Style::default().fg(Color::White)),
    ]);
    let search_bar = Paragraph::new(search_line).style(bar_style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(bar_style)
            .title(" Search country ")
            .title_top(
                Line::from(format!(" Sort By (s): {} ", screen.sort.label())).alignment(Alignment::Right),
            ),
    );
    frame.render_widget(search_bar, chunks[1]);

    if editing {
        let cursor_x = chunks[1].x + 1 + (search_label.width() + screen.search.width()) as u16;
        frame.set_cursor_position((cursor_x.min(chunks[1].right().saturating_sub(2)), chunks[1].y + 1));
    }

    // ── Cards ──
    let name_width = (area.width as usize).saturating_sub(8);
    let items: Vec<ListItem> = screen
        .cards()
        .map(|country| {
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        super::truncate_str(&country.name.common, name_width),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!("  [{}]", country.cca3), Style::default().fg(Color::DarkGray)),
                ]),
                Line::styled(
                    format!("  {}", super::truncate_str(&country.name.official, name_width)),
                    Style::default().fg(Color::Gray),
                ),
                Line::from(vec![
                    Span::styled("  Region: ", Style::default().fg(Color::Cyan)),
                    Span::raw(&country.region),
                ]),
            ])
        })
        .collect();

    let page_info = format!(
        " {} of {} ",
        if screen.visible.is_empty() { 0 } else { screen.selected + 1 },
        screen.visible.len()
    );

    let list_widget = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Countries ")
                .title_bottom(Line::from(page_info).alignment(Alignment::Right)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let mut list_state = ListState::default();
    if !screen.visible.is_empty() {
        list_state.select(Some(screen.selected));
    }
    frame.render_stateful_widget(list_widget, chunks[2], &mut list_state);

    if screen.state.loading {
        super::loader::render(frame, chunks[2]);
    } else if let Some(message) = screen.state.banner_after_loading() {
        let banner_area = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(chunks[2].inner(ratatui::layout::Margin::new(1, 1)))[0];
        frame.render_widget(super::error_banner(message), banner_area);
    }

    // ── Status bar ──
    super::render_status(
        app,
        &[
            ("↑↓", "Navigate"),
            ("/", "Search"),
            ("s", "Sort"),
            ("Enter", "View"),
            ("o/m", "Maps"),
            ("?", "Help"),
            ("q", "Quit"),
        ],
        frame,
        chunks[3],
    );
}

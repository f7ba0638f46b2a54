use crate::app::{App, DetailScreen};
use crate::country::{Country, NONE_LABEL};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn render(app: &App, screen: &DetailScreen, frame: &mut Frame) {
    let area = frame.area();

    // Layout: header(2) + banner(0|3) + card(min) + status(1)
    let banner_height = if screen.state.error.is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(banner_height),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    super::render_header(app, &format!("Country Details - {}", screen.name), frame, chunks[0]);

    if let Some(message) = &screen.state.error {
        frame.render_widget(super::error_banner(message), chunks[1]);
    }

    let count = screen.state.records.len();
    let title = if count > 1 {
        format!(" Record {} of {} [Tab] ", screen.selected + 1, count)
    } else {
        " Record ".to_string()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title)
        .title_bottom(Line::from(format!(" scroll: {} ", screen.scroll)).alignment(Alignment::Right));

    match screen.selected_country() {
        Some(country) => {
            let card = Paragraph::new(card_lines(country))
                .wrap(Wrap { trim: false })
                .scroll((screen.scroll, 0))
                .block(block);
            frame.render_widget(card, chunks[2]);
        }
        None => {
            let empty = if screen.state.loading || screen.state.error.is_some() {
                ""
            } else {
                "No country matches this name."
            };
            frame.render_widget(
                Paragraph::new(empty).style(Style::default().fg(Color::DarkGray)).block(block),
                chunks[2],
            );
        }
    }

    if screen.state.loading {
        super::loader::render(frame, chunks[2]);
    }

    let back_hint = if screen.state.loading { "(disabled)" } else { "Back to Home" };
    super::render_status(
        app,
        &[
            ("↑↓/PgUp/PgDn", "Scroll"),
            ("Tab", "Next"),
            ("o/m", "Maps"),
            ("Esc", back_hint),
            ("?", "Help"),
        ],
        frame,
        chunks[3],
    );
}

fn field<'a>(label: &'a str, value: impl Into<String>) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!(" {:<22}", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value.into(), Style::default().fg(Color::White)),
    ])
}

fn section(title: &str) -> Line<'_> {
    Line::styled(
        format!(" {}", title),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )
}

fn link(label: &str, url: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {:<22}", label), Style::default().fg(Color::DarkGray)),
        Span::styled(
            url.to_string(),
            Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
        ),
    ])
}

fn card_lines(country: &Country) -> Vec<Line<'_>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {}", country.name.common),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" ({})", country.name.official),
                Style::default().fg(Color::Gray),
            ),
        ]),
        Line::from(""),
        field("Capital:", country.capital_display()),
        field("Region:", country.region.as_str()),
        field("Subregion:", country.subregion_display()),
        field("Area:", country.area_display()),
        field("Population:", country.population_display()),
        field("Currency:", country.currency_display()),
        field("Languages:", country.languages_display()),
    ];

    let un_style = if country.un_member {
        Style::default().fg(Color::White).bg(Color::Green)
    } else {
        Style::default().fg(Color::White).bg(Color::Red)
    };
    lines.push(Line::from(vec![
        Span::styled(format!(" {:<22}", "United Nation Member:"), Style::default().fg(Color::DarkGray)),
        Span::styled(format!(" {} ", country.un_member_label()), un_style),
    ]));

    lines.push(Line::from(""));
    lines.push(field("Borders:", country.borders_display()));
    lines.push(field("Time Zone:", country.timezones_display()));

    lines.push(Line::from(""));
    lines.push(section("Maps"));
    lines.push(link("Google Maps (o):", &country.maps.google_maps));
    lines.push(link("OpenStreetMap (m):", &country.maps.open_street_maps));

    lines.push(Line::from(""));
    lines.push(section("Native Names"));
    let mut any_native = false;
    for (lang, common) in country.native_names() {
        any_native = true;
        lines.push(field_owned(format!("{}:", lang.to_uppercase()), common));
    }
    if !any_native {
        lines.push(field("", NONE_LABEL));
    }

    lines.push(Line::from(""));
    lines.push(section("Images"));
    if let Some(flag) = country.flag_url() {
        lines.push(link("Flag:", flag));
    }
    if let Some(alt) = country.flags.alt.as_deref().filter(|a| !a.is_empty()) {
        lines.push(Line::styled(format!(" {}", alt), Style::default().fg(Color::Gray)));
    }
    if let Some(coat) = country.coat_of_arms_url() {
        lines.push(link("Coat of Arms:", coat));
    }

    lines
}

/// Unwrapped line count of a country's card.
pub fn card_height(country: &Country) -> u16 {
    u16::try_from(card_lines(country).len()).unwrap_or(u16::MAX)
}

fn field_owned(label: String, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {:<22}", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value.to_string(), Style::default().fg(Color::White)),
    ])
}

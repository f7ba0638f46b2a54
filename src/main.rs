mod api;
mod app;
mod config;
mod country;
mod load;
mod logging;
mod router;
mod ui;
mod view;

use api::{CountryClient, CountrySource, Query, QueryKind};
use app::{App, InputMode, MapLink, Screen};
use clap::{Parser, Subcommand};
use config::Settings;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use indicatif::{ProgressBar, ProgressStyle};
use router::Route;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// TUI explorer for the REST Countries catalog
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to open first: /, /home or /country-details/<name>
    #[arg(short, long, default_value = "/")]
    path: String,

    /// Override the API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single query and print the matching countries
    Fetch {
        /// Query kind: all, name, currency or lang
        kind: String,
        /// Value for name, currency and lang queries
        value: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(url) = cli.base_url {
        settings.base_url = url;
        settings.validate()?;
    }

    match cli.command {
        Some(Commands::Fetch { kind, value }) => {
            // Unknown kinds fail here, before any request goes out.
            let kind: QueryKind = kind.parse()?;
            let query = Query::new(kind, value.as_deref());
            run_fetch(&settings, query).await?;
        }
        None => {
            let source: Arc<dyn CountrySource> = Arc::new(CountryClient::new(settings.base_url.clone()));
            let mut app = App::new(source, settings);
            app.navigate(Route::parse(&cli.path));

            let mut terminal = ratatui::init();
            let size = terminal.size()?;
            app.update_page_size(size.height);

            let result = run_app(&mut terminal, &mut app).await;

            ratatui::restore();

            if let Err(e) = result {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn run_fetch(settings: &Settings, query: Query) -> Result<(), Box<dyn std::error::Error>> {
    let client = CountryClient::new(settings.base_url.clone());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Querying {} ({})", client.base_url(), query));
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = client.fetch(&query, &CancellationToken::new()).await;
    pb.finish_and_clear();

    let countries = result.map_err(|e| e.user_message())?;
    for c in &countries {
        println!("{}\t{}\t{}\t{}", c.cca3, c.name.common, c.region, c.capital_display());
    }
    eprintln!("{} countries", countries.len());
    Ok(())
}

async fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.drain_loads();
        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Short poll keeps the loading spinner moving.
        if crossterm::event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    handle_key(app, key);
                }
                Event::Resize(_, height) => {
                    app.update_page_size(height);
                }
                _ => {}
            }
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Search => return handle_search_input(app, key),
        InputMode::Address => return handle_address_input(app, key),
        InputMode::Normal => {}
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('?') => {
            app.show_help = true;
            return;
        }
        KeyCode::Char(':') => {
            app.start_address();
            return;
        }
        KeyCode::Char('r') => {
            app.reload();
            return;
        }
        _ => {}
    }

    match app.screen {
        Screen::List(_) => handle_list_key(app, key),
        Screen::Detail(_) => handle_detail_key(app, key),
        Screen::NotFound { .. } => handle_not_found_key(app, key),
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => app.search_pop(),
        KeyCode::Char(c) => app.search_push(c),
        _ => {}
    }
}

fn handle_address_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_address(),
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.address.pop();
        }
        KeyCode::Char(c) => app.address.push(c),
        _ => {}
    }
}

fn handle_list_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Char('s') => app.cycle_sort(true),
        KeyCode::Char('S') => app.cycle_sort(false),
        KeyCode::Down | KeyCode::Char('j') => app.list_next(),
        KeyCode::Up | KeyCode::Char('k') => app.list_prev(),
        KeyCode::PageDown => app.list_page_down(),
        KeyCode::PageUp => app.list_page_up(),
        KeyCode::Char('g') | KeyCode::Home => app.list_first(),
        KeyCode::Char('G') | KeyCode::End => app.list_last(),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Char('o') => app.open_map(MapLink::Google),
        KeyCode::Char('m') => app.open_map(MapLink::OpenStreetMap),
        // Clear search
        KeyCode::Esc => app.clear_search(),
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace => {
            app.back();
        }
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.scroll_by(1),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_by(-1),
        KeyCode::PageDown => app.scroll_by(20),
        KeyCode::PageUp => app.scroll_by(-20),
        KeyCode::Tab => app.next_card(true),
        KeyCode::BackTab => app.next_card(false),
        KeyCode::Char('o') => app.open_map(MapLink::Google),
        KeyCode::Char('m') => app.open_map(MapLink::OpenStreetMap),
        _ => {}
    }
}

fn handle_not_found_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => app.navigate(Route::List),
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

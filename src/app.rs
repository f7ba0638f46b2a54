use crate::api::{CountrySource, Query};
use crate::config::Settings;
use crate::country::Country;
use crate::load::{self, LoadChannels, LoadMessage};
use crate::router::Route;
use crate::view::{self, SortOrder, ViewState};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Input mode for the search and address bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Address,
}

/// Which map link to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapLink {
    Google,
    OpenStreetMap,
}

/// List screen: all records plus the derived, filtered and sorted view.
#[derive(Debug)]
pub struct ListScreen {
    pub state: ViewState,
    pub search: String,
    pub sort: SortOrder,
    /// Indices into `state.records`, in display order.
    pub visible: Vec<usize>,
    pub selected: usize,
}

impl ListScreen {
    fn new(state: ViewState) -> Self {
        Self {
            state,
            search: String::new(),
            sort: SortOrder::default(),
            visible: Vec::new(),
            selected: 0,
        }
    }

    fn refresh(&mut self) {
        self.visible = view::filter_and_sort(&self.state.records, &self.search, self.sort);
        self.selected = 0;
    }

    pub fn cards(&self) -> impl Iterator<Item = &Country> + '_ {
        self.visible.iter().map(|&i| &self.state.records[i])
    }

    pub fn selected_country(&self) -> Option<&Country> {
        self.visible
            .get(self.selected)
            .map(|&i| &self.state.records[i])
    }
}

/// Detail screen for one exact name.
#[derive(Debug)]
pub struct DetailScreen {
    pub name: String,
    pub state: ViewState,
    pub selected: usize,
    pub scroll: u16,
}

impl DetailScreen {
    pub fn selected_country(&self) -> Option<&Country> {
        self.state.records.get(self.selected)
    }
}

#[derive(Debug)]
pub enum Screen {
    List(ListScreen),
    Detail(DetailScreen),
    NotFound { path: String },
}

/// Rows taken by each country card in the list.
pub const CARD_HEIGHT: u16 = 3;
pub const LIST_OVERHEAD: u16 = 8;

/// Main application state.
pub struct App {
    source: Arc<dyn CountrySource>,
    settings: Settings,

    pub route: Route,
    pub screen: Screen,
    pub should_quit: bool,
    pub show_help: bool,
    pub input_mode: InputMode,
    pub address: String,
    pub page_size: usize,
    pub status_msg: String,

    // Active mount
    generation: u64,
    cancel: CancellationToken,
    loads: LoadChannels,
}

impl App {
    pub fn new(source: Arc<dyn CountrySource>, settings: Settings) -> Self {
        Self {
            source,
            settings,
            route: Route::List,
            screen: Screen::NotFound { path: String::new() },
            should_quit: false,
            show_help: false,
            input_mode: InputMode::Normal,
            address: String::new(),
            page_size: 10,
            status_msg: String::new(),
            generation: 0,
            cancel: CancellationToken::new(),
            loads: LoadChannels::new(),
        }
    }

    /// Unmount the current screen and mount the one for `route`.
    pub fn navigate(&mut self, route: Route) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.generation += 1;
        self.input_mode = InputMode::Normal;
        tracing::info!(path = %route, generation = self.generation, "navigate");

        self.screen = match &route {
            Route::List => {
                self.start_load(Query::all(), self.settings.list_min_display());
                Screen::List(ListScreen::new(ViewState::new(self.settings.list_policy())))
            }
            Route::Detail { name } => {
                self.start_load(Query::name(name.as_str()), self.settings.detail_min_display());
                Screen::Detail(DetailScreen {
                    name: name.clone(),
                    state: ViewState::new(self.settings.detail_policy()),
                    selected: 0,
                    scroll: 0,
                })
            }
            Route::NotFound { path } => Screen::NotFound { path: path.clone() },
        };
        self.status_msg = match &route {
            Route::NotFound { .. } => String::new(),
            _ => "Loading...".to_string(),
        };
        self.route = route;
    }

    /// Remount the current route with a fresh fetch.
    pub fn reload(&mut self) {
        self.navigate(self.route.clone());
    }

    fn start_load(&self, query: Query, min_display: std::time::Duration) {
        load::spawn_load(
            Arc::clone(&self.source),
            query,
            min_display,
            self.generation,
            self.cancel.clone(),
            self.loads.tx.clone(),
        );
    }

    /// Apply every load result that has arrived.
    pub fn drain_loads(&mut self) {
        while let Ok(msg) = self.loads.rx.try_recv() {
            self.handle_load(msg);
        }
    }

    pub fn handle_load(&mut self, msg: LoadMessage) {
        if msg.generation != self.generation {
            tracing::debug!(stale = msg.generation, active = self.generation, "discarding stale load");
            return;
        }
        match &mut self.screen {
            Screen::List(list) => {
                list.state.finish(msg.result);
                list.refresh();
                self.status_msg = if list.state.error.is_some() {
                    String::new()
                } else {
                    format!("{} countries loaded", list.state.records.len())
                };
            }
            Screen::Detail(detail) => {
                detail.state.finish(msg.result);
                self.status_msg = if detail.state.error.is_some() {
                    String::new()
                } else {
                    format!("{} record(s) for \"{}\"", detail.state.records.len(), detail.name)
                };
            }
            Screen::NotFound { .. } => {}
        }
    }

    pub fn is_loading(&self) -> bool {
        match &self.screen {
            Screen::List(l) => l.state.loading,
            Screen::Detail(d) => d.state.loading,
            Screen::NotFound { .. } => false,
        }
    }

    pub fn update_page_size(&mut self, terminal_height: u16) {
        let rows = terminal_height.saturating_sub(LIST_OVERHEAD) / CARD_HEIGHT;
        self.page_size = (rows as usize).max(1);
    }

    // ── List screen ──

    /// Enter search editing; refused while loading.
    pub fn start_search(&mut self) {
        if self.is_loading() {
            self.status_msg = "Search is disabled while loading".to_string();
            return;
        }
        if matches!(self.screen, Screen::List(_)) {
            self.input_mode = InputMode::Search;
        }
    }

    pub fn search_push(&mut self, c: char) {
        if let Screen::List(list) = &mut self.screen {
            list.search.push(c);
            list.refresh();
        }
    }

    pub fn search_pop(&mut self) {
        if let Screen::List(list) = &mut self.screen {
            list.search.pop();
            list.refresh();
        }
    }

    pub fn clear_search(&mut self) {
        if let Screen::List(list) = &mut self.screen {
            if !list.search.is_empty() {
                list.search.clear();
                list.refresh();
            }
        }
    }

    pub fn cycle_sort(&mut self, forward: bool) {
        if self.is_loading() {
            self.status_msg = "Sorting is disabled while loading".to_string();
            return;
        }
        if let Screen::List(list) = &mut self.screen {
            list.sort = if forward { list.sort.next() } else { list.sort.prev() };
            list.refresh();
            self.status_msg = format!("Sort by {}", list.sort.label());
        }
    }

    pub fn list_next(&mut self) {
        if let Screen::List(list) = &mut self.screen {
            if list.selected + 1 < list.visible.len() {
                list.selected += 1;
            }
        }
    }

    pub fn list_prev(&mut self) {
        if let Screen::List(list) = &mut self.screen {
            list.selected = list.selected.saturating_sub(1);
        }
    }

    pub fn list_page_down(&mut self) {
        let page = self.page_size;
        if let Screen::List(list) = &mut self.screen {
            let last = list.visible.len().saturating_sub(1);
            list.selected = (list.selected + page).min(last);
        }
    }

    pub fn list_page_up(&mut self) {
        let page = self.page_size;
        if let Screen::List(list) = &mut self.screen {
            list.selected = list.selected.saturating_sub(page);
        }
    }

    pub fn list_first(&mut self) {
        if let Screen::List(list) = &mut self.screen {
            list.selected = 0;
        }
    }

    pub fn list_last(&mut self) {
        if let Screen::List(list) = &mut self.screen {
            list.selected = list.visible.len().saturating_sub(1);
        }
    }

    /// Navigate to the detail screen of the selected card.
    pub fn open_selected(&mut self) {
        let name = match &self.screen {
            Screen::List(list) => list.selected_country().map(|c| c.name.common.clone()),
            _ => None,
        };
        if let Some(name) = name {
            self.navigate(Route::detail(name));
        }
    }

    // ── Detail screen ──

    /// Back to the list; refused while loading.
    pub fn back(&mut self) -> bool {
        if self.is_loading() {
            self.status_msg = "Still loading...".to_string();
            return false;
        }
        self.navigate(Route::List);
        true
    }

    pub fn next_card(&mut self, forward: bool) {
        if let Screen::Detail(detail) = &mut self.screen {
            let count = detail.state.records.len();
            if count == 0 {
                return;
            }
            detail.selected = if forward {
                (detail.selected + 1) % count
            } else {
                (detail.selected + count - 1) % count
            };
            detail.scroll = 0;
        }
    }

    /// Scroll the detail card, keeping its last line reachable.
    pub fn scroll_by(&mut self, delta: i32) {
        if let Screen::Detail(detail) = &mut self.screen {
            let max = detail
                .selected_country()
                .map(|c| crate::ui::card_height(c).saturating_sub(1))
                .unwrap_or(0);
            let step = u16::try_from(delta.unsigned_abs()).unwrap_or(u16::MAX);
            detail.scroll = if delta < 0 {
                detail.scroll.saturating_sub(step)
            } else {
                detail.scroll.saturating_add(step).min(max)
            };
        }
    }

    // ── Shared ──

    pub fn selected_country(&self) -> Option<&Country> {
        match &self.screen {
            Screen::List(list) => list.selected_country(),
            Screen::Detail(detail) => detail.selected_country(),
            Screen::NotFound { .. } => None,
        }
    }

    pub fn map_url(&self, link: MapLink) -> Option<String> {
        let country = self.selected_country()?;
        let url = match link {
            MapLink::Google => &country.maps.google_maps,
            MapLink::OpenStreetMap => &country.maps.open_street_maps,
        };
        (!url.is_empty()).then(|| url.clone())
    }

    /// Open a map link of the selected record in the system browser.
    pub fn open_map(&mut self, link: MapLink) {
        let Some(url) = self.map_url(link) else {
            return;
        };
        match open::that_detached(&url) {
            Ok(()) => self.status_msg = format!("Opening: {}", url),
            Err(e) => {
                tracing::warn!(%url, error = %e, "failed to open link");
                self.status_msg = format!("Link: {} (no browser available)", url);
            }
        }
    }

    pub fn start_address(&mut self) {
        self.address = self.route.path();
        self.input_mode = InputMode::Address;
    }

    pub fn submit_address(&mut self) {
        let route = Route::parse(&self.address);
        self.navigate(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, QueryKind};
    use crate::country::fixtures::{country, countries};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// In-memory source; records every query it receives.
    struct Stub {
        all: Result<Vec<(String, String)>, u16>,
        by_name: Option<u16>,
        queries: Mutex<Vec<Query>>,
    }

    impl Stub {
        fn ok(names: &[(&str, &str)]) -> Self {
            Self {
                all: Ok(names.iter().map(|(n, r)| (n.to_string(), r.to_string())).collect()),
                by_name: None,
                queries: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: u16) -> Self {
            Self { all: Err(status), by_name: Some(status), queries: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl CountrySource for Stub {
        async fn fetch(&self, query: &Query, _cancel: &CancellationToken) -> Result<Vec<Country>, ApiError> {
            self.queries.lock().unwrap().push(query.clone());
            match (&self.all, query.kind) {
                (Err(status), QueryKind::All) => Err(ApiError::Status { status: *status }),
                (Ok(rows), QueryKind::All) => {
                    Ok(rows.iter().map(|(n, r)| country(n, r)).collect())
                }
                (_, QueryKind::Name) => match self.by_name {
                    Some(status) => Err(ApiError::Status { status }),
                    None => Ok(vec![country(&query.value, "Europe")]),
                },
                _ => Ok(Vec::new()),
            }
        }
    }

    fn instant_settings() -> Settings {
        Settings {
            list_min_display_ms: 0,
            detail_min_display_ms: 0,
            ..Settings::default()
        }
    }

    fn app_with(stub: Stub, settings: Settings) -> (App, Arc<Stub>) {
        let stub = Arc::new(stub);
        let app = App::new(stub.clone(), settings);
        (app, stub)
    }

    async fn settle(app: &mut App) {
        let msg = app.loads.rx.recv().await.expect("load result");
        app.handle_load(msg);
    }

    fn list(app: &App) -> &ListScreen {
        match &app.screen {
            Screen::List(l) => l,
            other => panic!("expected list screen, got {:?}", other),
        }
    }

    fn detail(app: &App) -> &DetailScreen {
        match &app.screen {
            Screen::Detail(d) => d,
            other => panic!("expected detail screen, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_shows_all_records_after_load() {
        let names: Vec<String> = (0..250).map(|i| format!("Country {:03}", i)).collect();
        let rows: Vec<(&str, &str)> = names.iter().map(|n| (n.as_str(), "Europe")).collect();
        let (mut app, stub) = app_with(Stub::ok(&rows), instant_settings());

        app.navigate(Route::List);
        assert!(app.is_loading());
        settle(&mut app).await;

        let l = list(&app);
        assert!(!l.state.loading);
        assert_eq!(l.cards().count(), 250);
        assert!(l.state.banner_after_loading().is_none());
        assert_eq!(stub.queries.lock().unwrap().as_slice(), &[Query::all()]);
    }

    #[tokio::test]
    async fn test_search_without_match_is_not_an_error() {
        let (mut app, _) = app_with(Stub::ok(&[("France", "Europe"), ("Peru", "Americas")]), instant_settings());
        app.navigate(Route::List);
        settle(&mut app).await;

        app.start_search();
        assert_eq!(app.input_mode, InputMode::Search);
        for c in "zzzzstring-not-present".chars() {
            app.search_push(c);
        }
        let l = list(&app);
        assert_eq!(l.cards().count(), 0);
        assert!(l.state.error.is_none());

        app.clear_search();
        assert_eq!(list(&app).cards().count(), 2);
    }

    #[tokio::test]
    async fn test_search_and_sort_disabled_while_loading() {
        let (mut app, _) = app_with(Stub::ok(&[("France", "Europe")]), instant_settings());
        app.navigate(Route::List);
        app.start_search();
        assert_eq!(app.input_mode, InputMode::Normal);
        app.cycle_sort(true);
        assert_eq!(list(&app).sort, SortOrder::NameAsc);

        settle(&mut app).await;
        app.cycle_sort(true);
        assert_eq!(list(&app).sort, SortOrder::NameDesc);
    }

    #[tokio::test]
    async fn test_list_failure_shows_banner_and_clears_loading() {
        let (mut app, _) = app_with(Stub::failing(503), instant_settings());
        app.navigate(Route::List);
        settle(&mut app).await;

        let l = list(&app);
        assert!(!l.state.loading);
        assert_eq!(l.cards().count(), 0);
        assert_eq!(l.state.banner_after_loading(), Some("Error in loading the data"));
    }

    #[tokio::test]
    async fn test_detail_failure_keeps_loading_by_default() {
        let (mut app, _) = app_with(Stub::failing(404), instant_settings());
        app.navigate(Route::detail("Atlantis"));
        settle(&mut app).await;

        let d = detail(&app);
        assert!(d.state.loading);
        assert_eq!(d.state.error.as_deref(), Some("The country data is not loaded..."));
        // Back stays disabled while the indicator is up.
        assert!(!app.back());
        assert!(matches!(app.screen, Screen::Detail(_)));
    }

    #[tokio::test]
    async fn test_detail_failure_with_symmetric_policy() {
        let settings = Settings { detail_clears_loading_on_error: true, ..instant_settings() };
        let (mut app, _) = app_with(Stub::failing(404), settings);
        app.navigate(Route::detail("Atlantis"));
        settle(&mut app).await;

        let d = detail(&app);
        assert!(!d.state.loading);
        assert!(d.state.error.is_some());
        assert!(app.back());
        assert_eq!(app.route, Route::List);
    }

    #[tokio::test]
    async fn test_select_round_trip_to_detail() {
        let (mut app, stub) = app_with(
            Stub::ok(&[("Peru", "Americas"), ("Japan", "Asia"), ("Chile", "Americas")]),
            instant_settings(),
        );
        app.navigate(Route::List);
        settle(&mut app).await;

        app.list_next();
        let chosen = app.selected_country().unwrap().name.common.clone();
        assert_eq!(chosen, "Japan");
        app.open_selected();
        assert_eq!(app.route, Route::detail("Japan"));
        assert_eq!(app.route.path(), "/country-details/Japan");
        settle(&mut app).await;

        let d = detail(&app);
        assert!(!d.state.loading);
        assert!(d.state.records.iter().any(|c| c.name.common == chosen));
        assert_eq!(stub.queries.lock().unwrap().last(), Some(&Query::name("Japan")));
    }

    #[tokio::test]
    async fn test_back_refetches_list() {
        let (mut app, stub) = app_with(Stub::ok(&[("Peru", "Americas")]), instant_settings());
        app.navigate(Route::List);
        settle(&mut app).await;
        app.open_selected();
        settle(&mut app).await;
        assert!(app.back());
        settle(&mut app).await;

        assert_eq!(list(&app).cards().count(), 1);
        let kinds: Vec<QueryKind> = stub.queries.lock().unwrap().iter().map(|q| q.kind).collect();
        assert_eq!(kinds, vec![QueryKind::All, QueryKind::Name, QueryKind::All]);
    }

    #[tokio::test]
    async fn test_stale_result_is_discarded() {
        let (mut app, _) = app_with(Stub::ok(&[("Peru", "Americas")]), instant_settings());
        app.navigate(Route::List);
        let stale_generation = app.generation;
        app.navigate(Route::detail("Peru"));

        app.handle_load(LoadMessage {
            generation: stale_generation,
            result: Ok(countries(&[("Ghost", "Nowhere")])),
        });
        let d = detail(&app);
        assert!(d.state.loading);
        assert!(d.state.records.is_empty());
    }

    #[tokio::test]
    async fn test_not_found_route_has_no_load() {
        let (mut app, stub) = app_with(Stub::ok(&[]), instant_settings());
        app.address = "/definitely/not/here".to_string();
        app.submit_address();
        assert!(matches!(app.screen, Screen::NotFound { ref path } if path == "/definitely/not/here"));
        assert!(!app.is_loading());
        tokio::task::yield_now().await;
        assert!(stub.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_cursor_bounds() {
        let (mut app, _) = app_with(
            Stub::ok(&[("A", "x"), ("B", "x"), ("C", "x"), ("D", "x"), ("E", "x")]),
            instant_settings(),
        );
        app.page_size = 2;
        app.navigate(Route::List);
        settle(&mut app).await;

        app.list_prev();
        assert_eq!(list(&app).selected, 0);
        app.list_page_down();
        assert_eq!(list(&app).selected, 2);
        app.list_last();
        assert_eq!(list(&app).selected, 4);
        app.list_next();
        assert_eq!(list(&app).selected, 4);
        app.list_page_up();
        assert_eq!(list(&app).selected, 2);
        app.list_first();
        assert_eq!(list(&app).selected, 0);
    }

    #[tokio::test]
    async fn test_map_urls_follow_selection() {
        let (mut app, _) = app_with(Stub::ok(&[("Peru", "Americas")]), instant_settings());
        app.navigate(Route::List);
        assert!(app.map_url(MapLink::Google).is_none());
        settle(&mut app).await;
        assert_eq!(app.map_url(MapLink::Google).as_deref(), Some("https://goo.gl/maps/example"));
        assert_eq!(
            app.map_url(MapLink::OpenStreetMap).as_deref(),
            Some("https://www.openstreetmap.org/relation/1")
        );
    }

    #[tokio::test]
    async fn test_detail_scroll_stays_within_card() {
        let (mut app, _) = app_with(Stub::ok(&[]), instant_settings());
        app.navigate(Route::detail("Japan"));
        app.scroll_by(5);
        assert_eq!(detail(&app).scroll, 0, "nothing to scroll before the record arrives");
        settle(&mut app).await;

        let max = crate::ui::card_height(detail(&app).selected_country().unwrap()) - 1;
        app.scroll_by(1000);
        assert_eq!(detail(&app).scroll, max);
        app.scroll_by(-3);
        assert_eq!(detail(&app).scroll, max - 3);
        app.scroll_by(-1000);
        assert_eq!(detail(&app).scroll, 0);
    }

    #[tokio::test]
    async fn test_address_bar_round_trips_reserved_names() {
        let (mut app, stub) = app_with(Stub::ok(&[]), instant_settings());
        app.navigate(Route::detail("100% Land/North"));
        settle(&mut app).await;

        app.start_address();
        assert_eq!(app.address, "/country-details/100%25%20Land%2FNorth");
        app.submit_address();
        assert_eq!(app.route, Route::detail("100% Land/North"));
        settle(&mut app).await;
        assert_eq!(
            stub.queries.lock().unwrap().last(),
            Some(&Query::name("100% Land/North"))
        );
    }

    #[test]
    fn test_page_size_from_height() {
        let (mut app, _) = app_with(Stub::ok(&[]), instant_settings());
        app.update_page_size(LIST_OVERHEAD + CARD_HEIGHT * 7);
        assert_eq!(app.page_size, 7);
        app.update_page_size(2);
        assert_eq!(app.page_size, 1);
    }
}

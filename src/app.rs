use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Direction, Layout},
    style::Color,
    widgets::ListState,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::browse::{Action, BrowseState, Debouncer, Effect, FilterChip, ProxyClient};
use crate::catalog::MediaItem;
use crate::config::Config;
use crate::error::Result;
use crate::ui::{Focus, render_detail_view, render_search_view, widgets};

pub enum AppMessage {
    SearchResults { seq: u64, items: Vec<MediaItem> },
    SearchError { seq: u64, error: String },
}

pub struct App {
    pub config: Config,
    pub running: bool,
    pub accent: Color,

    pub state: BrowseState,
    pub debouncer: Debouncer,
    pub focus: Focus,
    pub show_filters: bool,
    pub filter_cursor: usize,
    pub results_state: ListState,

    pub msg_tx: mpsc::UnboundedSender<AppMessage>,
    pub msg_rx: mpsc::UnboundedReceiver<AppMessage>,

    pub client: Arc<ProxyClient>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let accent = widgets::parse_accent_color(&config.ui.accent_color);
        let debouncer = Debouncer::new(Duration::from_millis(config.ui.debounce_ms));
        let client = Arc::new(ProxyClient::new(&config.ui.proxy_url));
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();

        Self {
            config,
            running: true,
            accent,
            state: BrowseState::new(),
            debouncer,
            focus: Focus::Query,
            show_filters: false,
            filter_cursor: 0,
            results_state: ListState::default(),
            msg_tx,
            msg_rx,
            client,
        }
    }

    pub async fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        // Initial unfiltered listing.
        self.perform_search();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
            self.process_messages();

            if self.debouncer.fire(Instant::now()) {
                self.perform_search();
            }
        }

        Ok(())
    }

    fn process_messages(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            let current = msg_seq(&msg) == self.state.latest_seq();
            match msg {
                AppMessage::SearchResults { seq, items } => {
                    info!(seq, count = items.len(), "Search results received");
                    self.apply_action(Action::SearchSucceeded { seq, items });
                }
                AppMessage::SearchError { seq, error } => {
                    error!(seq, error = %error, "Search failed");
                    self.apply_action(Action::SearchFailed { seq });
                }
            }
            if current {
                debug!(phase = ?self.state.phase(), "Results updated");
                self.reset_results_selection();
            }
        }
    }

    fn reset_results_selection(&mut self) {
        if self.state.results().is_empty() {
            self.results_state.select(None);
            if self.focus == Focus::Results {
                self.focus = Focus::Query;
            }
        } else {
            self.results_state.select(Some(0));
        }
    }

    fn apply_action(&mut self, action: Action) {
        match self.state.apply(action) {
            Effect::None => {}
            Effect::ScheduleSearch => self.debouncer.arm(Instant::now()),
            Effect::SearchNow => {
                self.debouncer.cancel();
                self.perform_search();
            }
        }
    }

    fn perform_search(&mut self) {
        let request = self.state.begin_search();
        debug!(seq = request.seq, filters = ?request.filters, "Starting search");

        let client = Arc::clone(&self.client);
        let tx = self.msg_tx.clone();

        tokio::spawn(async move {
            let seq = request.seq;
            let msg = match client.search(&request.filters).await {
                Ok(items) => AppMessage::SearchResults { seq, items },
                Err(e) => AppMessage::SearchError {
                    seq,
                    error: e.to_string(),
                },
            };
            let _ = tx.send(msg);
        });
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(frame.area());

        let main_area = chunks[0];
        let help_area = chunks[1];

        render_search_view(
            frame,
            main_area,
            &self.state,
            &mut self.results_state,
            self.focus,
            self.show_filters.then_some(self.filter_cursor),
            self.config.ui.description_limit,
            self.accent,
        );

        if let Some(item) = self.state.selected() {
            render_detail_view(frame, main_area, item, self.accent);
            let help = widgets::help_bar(&[("o", "open on AniList"), ("Esc", "close")]);
            frame.render_widget(help, help_area);
            return;
        }

        let hints: &[(&str, &str)] = match self.focus {
            Focus::Query => &[
                ("Tab", "filters"),
                ("↓", "results"),
                ("^X", "clear"),
                ("^G", "home"),
                ("^C", "quit"),
            ],
            Focus::Filters => &[
                ("←→", "move"),
                ("Space", "toggle"),
                ("Tab", "close"),
                ("^X", "clear"),
            ],
            Focus::Results => &[
                ("j/k", "move"),
                ("Enter", "details"),
                ("/", "search"),
                ("q", "quit"),
            ],
        };
        frame.render_widget(widgets::help_bar(hints), help_area);
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    return Ok(());
                }
                self.handle_key(key);
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            self.running = false;
            return;
        }

        if self.state.selected().is_some() {
            self.handle_detail_input(key.code);
            return;
        }

        match key.code {
            KeyCode::Tab => {
                self.toggle_filter_panel();
                return;
            }
            KeyCode::Char('x') if ctrl => {
                self.apply_action(Action::ClearFilters);
                return;
            }
            KeyCode::Char('g') if ctrl => {
                self.go_home();
                return;
            }
            KeyCode::Home => {
                self.go_home();
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Query => self.handle_query_input(key),
            Focus::Filters => self.handle_filter_input(key.code),
            Focus::Results => self.handle_results_input(key.code),
        }
    }

    fn go_home(&mut self) {
        debug!(pending = self.debouncer.is_armed(), "Returning home");
        self.show_filters = false;
        self.focus = Focus::Query;
        self.apply_action(Action::GoHome);
    }

    fn toggle_filter_panel(&mut self) {
        self.show_filters = !self.show_filters;
        self.focus = if self.show_filters {
            Focus::Filters
        } else {
            Focus::Query
        };
    }

    fn handle_query_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let mut query = self.state.filters().query.clone();
                query.push(c);
                self.apply_action(Action::SetQuery(query));
            }
            KeyCode::Backspace => {
                let mut query = self.state.filters().query.clone();
                if query.pop().is_some() {
                    self.apply_action(Action::SetQuery(query));
                }
            }
            KeyCode::Esc => {
                if !self.state.filters().query.is_empty() {
                    self.apply_action(Action::SetQuery(String::new()));
                }
            }
            KeyCode::Down | KeyCode::Enter => {
                if !self.state.results().is_empty() {
                    self.focus = Focus::Results;
                    if self.results_state.selected().is_none() {
                        self.results_state.select(Some(0));
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_filter_input(&mut self, key: KeyCode) {
        let chips = FilterChip::all();
        match key {
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Up | KeyCode::Char('k') => {
                self.filter_cursor = self.filter_cursor.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Down | KeyCode::Char('j') => {
                if self.filter_cursor + 1 < chips.len() {
                    self.filter_cursor += 1;
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(chip) = chips.get(self.filter_cursor) {
                    self.apply_action(chip.toggle_action());
                }
            }
            KeyCode::Esc => self.toggle_filter_panel(),
            _ => {}
        }
    }

    fn handle_results_input(&mut self, key: KeyCode) {
        let len = self.state.results().len();
        match key {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('j') | KeyCode::Down => {
                if len > 0 {
                    let next = self
                        .results_state
                        .selected()
                        .map_or(0, |i| (i + 1).min(len - 1));
                    self.results_state.select(Some(next));
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                match self.results_state.selected() {
                    Some(0) | None => self.focus = Focus::Query,
                    Some(i) => self.results_state.select(Some(i - 1)),
                }
            }
            KeyCode::Enter | KeyCode::Char('l') => {
                if let Some(idx) = self.results_state.selected() {
                    self.apply_action(Action::SelectItem(idx));
                }
            }
            KeyCode::Esc | KeyCode::Char('/') => self.focus = Focus::Query,
            _ => {}
        }
    }

    fn handle_detail_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => {
                self.apply_action(Action::DeselectItem);
            }
            KeyCode::Char('o') => {
                let Some(url) = self.state.selected().and_then(|m| m.site_url.clone()) else {
                    warn!("Selected entry has no site URL");
                    return;
                };
                info!(url = %url, "Opening in browser");
                if let Err(e) = open::that(&url) {
                    error!(error = %e, "Failed to open browser");
                }
            }
            _ => {}
        }
    }
}

fn msg_seq(msg: &AppMessage) -> u64 {
    match msg {
        AppMessage::SearchResults { seq, .. } | AppMessage::SearchError { seq, .. } => *seq,
    }
}

pub fn init_terminal() -> io::Result<DefaultTerminal> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
    Ok(ratatui::init())
}

pub fn restore_terminal() -> io::Result<()> {
    ratatui::restore();
    Ok(())
}

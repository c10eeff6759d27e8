//! Top-level application state and the main event loop.
//!
//! [`AppState`] holds everything drawn on screen and reacts to key events
//! without doing any IO. [`App`] owns the state together with a tokio
//! runtime and runs the [`Action`]s that need the filesystem or network.

use std::path::PathBuf;
use std::time::Duration;

use chartboard_core::{
    config::Config,
    normalizer::{self, NormalizedBatch},
    sample, ChartKind, Clock, RawRecord, SystemClock,
};
use chartboard_feeds::{Feed, FileFeed, FileWatcher, HttpFeed};
use crossterm::event::{self as ct_event, Event, KeyEventKind};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    widgets::Block,
    Frame,
};

use crate::{
    commands::{self, Action, Command},
    event::{self, AppEvent, Direction},
    session::TerminalSession,
    theme::Theme,
    widgets::{
        bar_chart::BarChartView,
        command_bar::{CommandBar, CommandBarState},
        help::HelpPopup,
        line_chart::LineChartView,
        notification::{Notification, NotificationPopup},
        pie_chart::PieChartView,
        records::{RecordsPane, RecordsState},
        status_bar::StatusBar,
        tab_bar::TabBar,
    },
};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const RECORDS_PANE_PCT: u16 = 32;

pub const BUILT_IN_SOURCE: &str = "built-in sample";

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    /// The records as loaded, before normalization.
    pub raw: Vec<RawRecord>,
    pub batch: NormalizedBatch,
    /// Where `raw` came from, shown in the status line.
    pub source: String,
    pub chart: ChartKind,
    pub records: RecordsState,
    pub theme: Theme,
    pub config: Config,
    pub show_help: bool,
    /// `:` command line is open.
    pub command_mode: bool,
    pub command_bar: CommandBarState,
    pub notification: Option<Notification>,
    /// Last informational message, shown in the status line.
    pub status: Option<String>,
    /// File being watched, if any.
    pub watching: Option<PathBuf>,
    pub quit: bool,
}

impl AppState {
    /// Fresh state showing the built-in sample dataset.
    pub fn new(config: Config, theme: Theme) -> Self {
        let chart = config.dashboard.default_chart;
        let mut state = Self {
            raw: Vec::new(),
            batch: NormalizedBatch {
                fields: Default::default(),
                records: Vec::new(),
            },
            source: String::new(),
            chart,
            records: RecordsState::default(),
            theme,
            config,
            show_help: false,
            command_mode: false,
            command_bar: CommandBarState::default(),
            notification: None,
            status: None,
            watching: None,
            quit: false,
        };
        state.set_dataset(sample::dashboard_default(), BUILT_IN_SOURCE);
        state
    }

    /// Replace the dataset and re-normalize it.
    pub fn set_dataset(&mut self, raw: Vec<RawRecord>, source: impl Into<String>) {
        self.set_dataset_with(raw, source, &SystemClock);
    }

    pub fn set_dataset_with<C: Clock + ?Sized>(
        &mut self,
        raw: Vec<RawRecord>,
        source: impl Into<String>,
        clock: &C,
    ) {
        self.batch = normalizer::normalize_batch_with(&raw, clock);
        self.raw = raw;
        self.source = source.into();
        self.records.clamp(self.batch.records.len());
        tracing::info!(
            source = %self.source,
            count = self.batch.records.len(),
            fields = %self.batch.fields,
            "dataset replaced"
        );
    }

    /// Raise a blocking notification. The dataset on screen is untouched.
    pub fn notify_error(&mut self, title: &str, error: &dyn std::error::Error) {
        tracing::warn!(%title, %error, "dashboard error");
        self.notification = Some(Notification::new(title, error.to_string()));
    }

    /// Apply a key event. Returns the IO the shell has to run, if any.
    pub fn handle(&mut self, event: AppEvent) -> Option<Action> {
        // A notification blocks everything until dismissed.
        if self.notification.is_some() {
            if matches!(event, AppEvent::Enter | AppEvent::Escape | AppEvent::Quit) {
                tracing::debug!("notification dismissed");
                self.notification = None;
            }
            return None;
        }

        // Help popup intercepts all events; only close keys pass through.
        if self.show_help {
            if matches!(event, AppEvent::Char('?') | AppEvent::Escape | AppEvent::Quit) {
                tracing::debug!("help popup closed");
                self.show_help = false;
            }
            return None;
        }

        if self.command_mode {
            return self.handle_command_mode(event);
        }

        match event {
            AppEvent::Char('?') => {
                tracing::debug!("help popup opened");
                self.show_help = true;
            }
            AppEvent::Char(':') => {
                tracing::debug!("entering command mode");
                self.command_bar.clear();
                self.command_mode = true;
            }
            AppEvent::Quit => self.quit = true,
            AppEvent::NextChart => self.chart = self.chart.next(),
            AppEvent::SelectChart(kind) => self.chart = kind,
            AppEvent::Fetch => return Some(Action::Fetch),
            AppEvent::Push => return Some(Action::Push),
            AppEvent::Nav(Direction::Up | Direction::Down)
            | AppEvent::ScrollUp
            | AppEvent::ScrollDown => {
                self.records.handle(&event, self.batch.records.len());
            }
            AppEvent::Escape => self.status = None,
            _ => {}
        }
        None
    }

    fn handle_command_mode(&mut self, event: AppEvent) -> Option<Action> {
        match event {
            AppEvent::Escape => {
                tracing::debug!("command bar cancelled");
                self.command_bar.clear();
                self.command_mode = false;
                None
            }
            AppEvent::Quit => {
                self.quit = true;
                None
            }
            AppEvent::Enter => match Command::parse(&self.command_bar.input) {
                Ok(cmd) => {
                    tracing::debug!(command = ?cmd, "executing command");
                    self.command_bar.clear();
                    self.command_mode = false;
                    commands::execute_command(self, cmd)
                }
                Err(msg) if msg.is_empty() => {
                    self.command_mode = false;
                    None
                }
                Err(msg) => {
                    self.command_bar.error = Some(msg);
                    None
                }
            },
            other => {
                self.command_bar.handle(&other);
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    state: AppState,
    runtime: tokio::runtime::Runtime,
    watcher: Option<FileWatcher>,
}

impl App {
    pub fn new(config: Config, theme: Theme) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            state: AppState::new(config, theme),
            runtime,
            watcher: None,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Replace the sample data with whatever the endpoint serves. An
    /// unreachable endpoint is logged and the sample data stays.
    pub fn try_initial_fetch(&mut self) {
        let endpoint = self.state.config.dashboard.endpoint.clone();
        let loaded = HttpFeed::new(&endpoint).map(|feed| {
            let result = self.runtime.block_on(feed.load());
            (feed.describe(), result)
        });
        match loaded {
            Ok((source, Ok(records))) => self.state.set_dataset(records, source),
            Ok((_, Err(e))) | Err(e) => {
                tracing::info!(%endpoint, error = %e, "endpoint unavailable, keeping sample data");
            }
        }
    }

    /// Run a side-effecting [`Action`]. Failures become notifications.
    pub fn perform(&mut self, action: Action) {
        tracing::debug!(?action, "performing action");
        match action {
            Action::Load(path) => {
                self.load_from(&FileFeed::new(path), "Load failed");
            }
            Action::Fetch => match HttpFeed::new(&self.state.config.dashboard.endpoint) {
                Ok(feed) => {
                    if self.load_from(&feed, "Fetch failed") {
                        self.state.status = Some("fetched".to_string());
                    }
                }
                Err(e) => self.state.notify_error("Fetch failed", &e),
            },
            Action::Push => self.push(),
            Action::Watch(path) => match FileWatcher::new(&path) {
                Ok(watcher) => {
                    let watched = watcher.path().to_path_buf();
                    self.watcher = Some(watcher);
                    self.state.watching = Some(watched.clone());
                    self.load_from(&FileFeed::new(watched), "Load failed");
                }
                Err(e) => self.state.notify_error("Watch failed", &e),
            },
            Action::Unwatch => {
                if let Some(w) = self.watcher.take() {
                    tracing::debug!(path = %w.path().display(), "stopped watching");
                    self.state.status = Some("stopped watching".to_string());
                }
                self.state.watching = None;
            }
        }
    }

    fn load_from<F: Feed>(&mut self, feed: &F, title: &str) -> bool {
        match self.runtime.block_on(feed.load()) {
            Ok(records) => {
                self.state.set_dataset(records, feed.describe());
                true
            }
            Err(e) => {
                self.state.notify_error(title, &e);
                false
            }
        }
    }

    fn push(&mut self) {
        let feed = match HttpFeed::new(&self.state.config.dashboard.endpoint) {
            Ok(feed) => feed,
            Err(e) => return self.state.notify_error("Push failed", &e),
        };
        let records = &self.state.batch.records;
        match self.runtime.block_on(feed.publish(records)) {
            Ok(()) => {
                self.state.status = Some(format!(
                    "pushed {} records to {}",
                    records.len(),
                    feed.endpoint()
                ));
            }
            Err(e) => self.state.notify_error("Push failed", &e),
        }
    }

    fn poll_watcher(&mut self) {
        let changed = self.watcher.as_ref().is_some_and(|w| w.try_changed());
        if !changed {
            return;
        }
        if let Some(path) = self.state.watching.clone() {
            tracing::debug!(path = %path.display(), "watched file changed");
            self.load_from(&FileFeed::new(path), "Reload failed");
        }
    }

    /// Take over the terminal and run until the user quits.
    pub fn run(mut self) -> anyhow::Result<()> {
        let mut session = TerminalSession::acquire()?;
        let terminal = session.terminal();

        loop {
            {
                let s = &self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.quit {
                break;
            }

            self.poll_watcher();

            if !ct_event::poll(POLL_INTERVAL)? {
                continue;
            }
            let raw = ct_event::read()?;
            if let Event::Key(key) = raw {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
            }
            let app_event = if self.state.command_mode {
                event::to_app_event_insert(raw)
            } else {
                event::to_app_event(raw)
            };
            if let Some(ev) = app_event {
                tracing::trace!(event = ?ev, "key event");
                if let Some(action) = self.state.handle(ev) {
                    self.perform(action);
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    // Vertical: 1-line tab bar | body | 1-line status
    let [tabs_area, body, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let [chart_area, records_area] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Percentage(RECORDS_PANE_PCT),
    ])
    .areas(body);

    let theme = &state.theme;
    let records = &state.batch.records;
    let ts_format = state.config.dashboard.timestamp_format.as_str();

    frame.render_widget(TabBar::new(state.chart, theme), tabs_area);

    let block = Block::bordered()
        .title(format!(" {} ", state.chart))
        .border_style(theme.border_focused);
    match state.chart {
        ChartKind::Bar => frame.render_widget(BarChartView::new(records, theme, block), chart_area),
        ChartKind::Line => frame.render_widget(
            LineChartView::new(records, ts_format, theme, block),
            chart_area,
        ),
        ChartKind::Pie => frame.render_widget(PieChartView::new(records, theme, block), chart_area),
    }

    frame.render_widget(
        RecordsPane::new(records, &state.records, ts_format, theme),
        records_area,
    );
    frame.render_widget(
        StatusBar::new(
            &state.source,
            &state.batch.fields,
            state.status.as_deref(),
            state.watching.is_some(),
            theme,
        ),
        status_area,
    );

    if state.show_help {
        frame.render_widget(HelpPopup::new(theme), area);
    }

    if let Some(notification) = &state.notification {
        frame.render_widget(NotificationPopup::new(notification, theme), area);
    }

    // Command bar overlays the status row.
    if state.command_mode {
        let cmd_area = Rect {
            y: area.bottom().saturating_sub(1),
            height: 1,
            ..area
        };
        frame.render_widget(CommandBar::new(&state.command_bar, theme), cmd_area);
        frame.set_cursor_position((state.command_bar.cursor_col(cmd_area), cmd_area.y));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

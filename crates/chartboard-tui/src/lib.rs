//! chartboard TUI: ratatui dashboard for normalized chart data.

pub mod app;
pub mod commands;
pub mod event;
pub mod session;
pub mod theme;
pub mod widgets;

use std::path::PathBuf;

use chartboard_core::{config::Config, ChartKind};

pub use app::App;

/// Start-up options collected by the CLI.
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub config: Config,
    /// Load this file instead of fetching from the endpoint.
    pub file: Option<PathBuf>,
    /// Overrides `dashboard.endpoint`.
    pub endpoint: Option<String>,
    /// Overrides `dashboard.default_chart`.
    pub chart: Option<ChartKind>,
}

/// Run the dashboard until the user quits.
pub fn run(options: DashboardOptions) -> anyhow::Result<()> {
    let mut config = options.config;
    if let Some(endpoint) = options.endpoint {
        config.dashboard.endpoint = endpoint;
    }
    if let Some(chart) = options.chart {
        config.dashboard.default_chart = chart;
    }

    let theme = theme::Theme::by_name(&config.dashboard.theme);
    let mut app = App::new(config, theme)?;

    match options.file {
        Some(path) => app.perform(commands::Action::Load(path)),
        None => app.try_initial_fetch(),
    }

    app.run()
}

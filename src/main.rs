use std::path::{Path, PathBuf};

use anyhow::Context;
use chartboard::server;
use chartboard_core::{
    config::Config,
    ingest,
    normalizer::{normalize_batch_with, NormalizedBatch},
    store::DatasetStore,
    ChartKind, SystemClock,
};
use chartboard_feeds::{Feed, HttpFeed};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "chartboard",
    version,
    about = "Normalize arbitrary records into chart data, serve them, and draw them"
)]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/chartboard/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging. The dashboard writes it to $TMPDIR/chartboard-debug.log.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Run the JSON data server.
    Serve {
        #[arg(long)]
        bind: Option<String>,
        /// File the dataset is persisted to.
        #[arg(long)]
        data_file: Option<PathBuf>,
    },
    /// Open the terminal dashboard.
    Dashboard {
        #[arg(long)]
        endpoint: Option<String>,
        /// Start from a local .json / .csv file instead of the endpoint.
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        chart: Option<ChartKind>,
    },
    /// Print the canonical records of a .json / .csv file.
    Normalize {
        file: PathBuf,
        /// Also print the inferred fields to stderr.
        #[arg(long)]
        explain: bool,
    },
    /// Normalize a file and POST it to the data endpoint.
    Push {
        file: PathBuf,
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// GET the data endpoint and print it normalized.
    Fetch {
        #[arg(long)]
        endpoint: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.command, cli.debug)?;

    let config = Config::load_from(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Cmd::Serve { bind, data_file } => {
            let bind = bind.unwrap_or(config.server.bind);
            let store = DatasetStore::new(data_file.unwrap_or(config.server.data_file));
            runtime()?.block_on(server::serve(&bind, store))
        }
        Cmd::Dashboard {
            endpoint,
            file,
            chart,
        } => chartboard_tui::run(chartboard_tui::DashboardOptions {
            config,
            file,
            endpoint,
            chart,
        }),
        Cmd::Normalize { file, explain } => {
            let batch = normalize_file(&file)?;
            if explain {
                eprintln!("{}: {} records, {}", file.display(), batch.records.len(), batch.fields);
            }
            print_json(&batch)
        }
        Cmd::Push { file, endpoint } => {
            let batch = normalize_file(&file)?;
            let feed = HttpFeed::new(&endpoint.unwrap_or(config.dashboard.endpoint))?;
            runtime()?
                .block_on(feed.publish(&batch.records))
                .with_context(|| format!("pushing to {}", feed.endpoint()))?;
            println!("pushed {} records to {}", batch.records.len(), feed.endpoint());
            Ok(())
        }
        Cmd::Fetch { endpoint } => {
            let feed = HttpFeed::new(&endpoint.unwrap_or(config.dashboard.endpoint))?;
            let records = runtime()?
                .block_on(feed.load())
                .with_context(|| format!("fetching from {}", feed.describe()))?;
            print_json(&normalize_batch_with(&records, &SystemClock))
        }
    }
}

fn normalize_file(path: &Path) -> anyhow::Result<NormalizedBatch> {
    let records =
        ingest::load_file(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(normalize_batch_with(&records, &SystemClock))
}

fn print_json(batch: &NormalizedBatch) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(&batch.records)?;
    println!("{text}");
    Ok(())
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("starting tokio runtime")
}

/// `serve` logs at info by default, other commands at warn. The dashboard
/// owns the terminal, so it only logs with `--debug`, and then to a file.
fn init_logging(command: &Cmd, debug: bool) -> anyhow::Result<()> {
    let default_level = match (debug, command) {
        (true, _) => "debug",
        (false, Cmd::Serve { .. }) => "info",
        (false, _) => "warn",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if let Cmd::Dashboard { .. } = command {
        if !debug {
            return Ok(());
        }
        let path = std::env::temp_dir().join("chartboard-debug.log");
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(filter)
            .init();
        tracing::info!(path = %path.display(), "chartboard debug log started");
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
    Ok(())
}

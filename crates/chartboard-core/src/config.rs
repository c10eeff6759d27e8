//! Configuration types for chartboard.
//!
//! [`Config::load`] layers, lowest to highest precedence: the embedded
//! defaults, `~/.config/chartboard/config.toml` (or an explicit path), and
//! `CHARTBOARD__SECTION__KEY` environment variables. [`Config::defaults`]
//! returns the embedded defaults without touching the filesystem (useful in
//! tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::types::ChartKind;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[server]
bind      = "127.0.0.1:3000"
data_file = "chart-data.json"

[dashboard]
endpoint         = "http://127.0.0.1:3000/data"
default_chart    = "bar"
timestamp_format = "%H:%M"
theme            = "default"
"#;

const ENV_PREFIX: &str = "CHARTBOARD";
const ENV_SEPARATOR: &str = "__";

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// `[server]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address the data server listens on.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// JSON file holding the last posted dataset.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

fn default_bind() -> String { "127.0.0.1:3000".to_string() }
fn default_data_file() -> PathBuf { PathBuf::from("chart-data.json") }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            data_file: default_data_file(),
        }
    }
}

/// `[dashboard]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Data endpoint fetched with `fetch` and written with `push`.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub default_chart: ChartKind,
    /// chrono format string for time labels.
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_endpoint() -> String { "http://127.0.0.1:3000/data".to_string() }
fn default_timestamp_format() -> String { "%H:%M".to_string() }
fn default_theme() -> String { "default".to_string() }

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            default_chart: ChartKind::default(),
            timestamp_format: default_timestamp_format(),
            theme: default_theme(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from the default location, layered on top of the built-in
    /// defaults. A missing file is not an error.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(None)
    }

    /// Load with an optional explicit config file.
    ///
    /// An explicit path must exist; the default path is optional.
    pub fn load_from(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (config_path(), false),
        };

        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path.as_path()).required(required))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR),
            )
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("chartboard")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load() {
        let cfg = Config::defaults();
        assert_eq!(cfg.server.bind, "127.0.0.1:3000");
        assert_eq!(cfg.server.data_file, PathBuf::from("chart-data.json"));
        assert_eq!(cfg.dashboard.endpoint, "http://127.0.0.1:3000/data");
        assert_eq!(cfg.dashboard.default_chart, ChartKind::Bar);
        assert_eq!(cfg.dashboard.timestamp_format, "%H:%M");
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("chartboard-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[dashboard]\ndefault_chart = \"pie\"\n").unwrap();

        let cfg = Config::load_from(Some(&path)).unwrap();
        assert_eq!(cfg.dashboard.default_chart, ChartKind::Pie);
        // Untouched keys keep their defaults.
        assert_eq!(cfg.server.bind, "127.0.0.1:3000");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let path = Path::new("/definitely/not/here/chartboard.toml");
        assert!(Config::load_from(Some(path)).is_err());
    }
}

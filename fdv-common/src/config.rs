//! Configuration loading and resolution
//!
//! Every setting is resolved independently in this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing config file is normal. An unreadable or malformed one, or an
//! unparseable override, is logged as a warning and skipped; resolution
//! never fails.

use crate::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

/// Default HTTP port for the dashboard service
pub const DEFAULT_PORT: u16 = 5740;

/// Default bind address (local only)
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Environment variable names
pub const ENV_DATA_SOURCE: &str = "FDV_DATA_SOURCE";
pub const ENV_DATA_DIR: &str = "FDV_DATA_DIR";
pub const ENV_DATABASE: &str = "FDV_DATABASE";
pub const ENV_REMOTE_URL: &str = "FDV_REMOTE_URL";
pub const ENV_BIND: &str = "FDV_BIND";
pub const ENV_PORT: &str = "FDV_PORT";
pub const ENV_LOG_LEVEL: &str = "FDV_LOG_LEVEL";

/// Where pipeline responses are loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceKind {
    /// JSON files in a directory
    Static,
    /// Built-in sample payloads
    #[default]
    Mock,
    /// Saved responses in the SQLite database
    Database,
    /// JSON documents served over HTTP
    Remote,
}

impl FromStr for SourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" | "file" => Ok(SourceKind::Static),
            "mock" => Ok(SourceKind::Mock),
            "database" | "db" => Ok(SourceKind::Database),
            "remote" | "http" => Ok(SourceKind::Remote),
            other => Err(Error::Config(format!("Unknown data source: {}", other))),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceKind::Static => "static",
            SourceKind::Mock => "mock",
            SourceKind::Database => "database",
            SourceKind::Remote => "remote",
        })
    }
}

/// TOML config file contents; every key optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub data_source: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub remote_url: Option<String>,
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

impl TomlConfig {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }
}

/// Command-line overrides; `None` means "not given"
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_source: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub remote_url: Option<String>,
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Fully resolved dashboard configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub data_source: SourceKind,
    pub data_dir: PathBuf,
    pub database: PathBuf,
    pub remote_url: Option<String>,
    pub bind: String,
    pub port: u16,
    pub log_level: String,
}

impl DashboardConfig {
    /// Compiled defaults for the current platform
    pub fn defaults() -> Self {
        let data_dir = default_data_dir();
        Self {
            data_source: SourceKind::default(),
            database: data_dir.join("fdv.db"),
            data_dir,
            remote_url: None,
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            log_level: "info".to_string(),
        }
    }

    /// Resolve against the process environment and the config file on disk
    pub fn resolve(cli: &Overrides) -> Self {
        let toml = load_toml_config();
        Self::resolve_with(cli, |key| std::env::var(key).ok(), toml.as_ref())
    }

    /// Resolve with an explicit environment lookup and config file
    pub fn resolve_with(
        cli: &Overrides,
        env: impl Fn(&str) -> Option<String>,
        toml: Option<&TomlConfig>,
    ) -> Self {
        let defaults = Self::defaults();
        let file = toml.cloned().unwrap_or_default();

        let data_dir = cli
            .data_dir
            .clone()
            .or_else(|| env(ENV_DATA_DIR).map(PathBuf::from))
            .or(file.data_dir)
            .unwrap_or(defaults.data_dir);

        // A relocated data directory carries the default database with it
        let database = cli
            .database
            .clone()
            .or_else(|| env(ENV_DATABASE).map(PathBuf::from))
            .or(file.database)
            .unwrap_or_else(|| data_dir.join("fdv.db"));

        Self {
            data_source: pick(
                "data_source",
                cli.data_source.as_deref(),
                env(ENV_DATA_SOURCE).as_deref(),
                file.data_source.as_deref(),
            )
            .unwrap_or(defaults.data_source),
            data_dir,
            database,
            remote_url: cli
                .remote_url
                .clone()
                .or_else(|| env(ENV_REMOTE_URL))
                .or(file.remote_url)
                .filter(|url| !url.trim().is_empty()),
            bind: cli
                .bind
                .clone()
                .or_else(|| env(ENV_BIND))
                .or(file.bind)
                .unwrap_or(defaults.bind),
            port: cli
                .port
                .or_else(|| pick("port", None, env(ENV_PORT).as_deref(), None))
                .or(file.port)
                .unwrap_or(defaults.port),
            log_level: cli
                .log_level
                .clone()
                .or_else(|| env(ENV_LOG_LEVEL))
                .or(file.log_level)
                .unwrap_or(defaults.log_level),
        }
    }
}

/// First tier that parses; unparseable tiers are warned about and skipped
fn pick<T: FromStr>(name: &str, cli: Option<&str>, env: Option<&str>, file: Option<&str>) -> Option<T> {
    [("command line", cli), ("environment", env), ("config file", file)]
        .into_iter()
        .filter_map(|(tier, value)| value.map(|v| (tier, v)))
        .find_map(|(tier, value)| match value.parse::<T>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                warn!("Ignoring invalid {} from {}: {:?}", name, tier, value);
                None
            }
        })
}

/// Locate the config file for the platform
///
/// Linux checks `~/.config/fdv/config.toml`, then `/etc/fdv/config.toml`.
fn config_file_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("fdv").join("config.toml"));
    if let Some(path) = user_config.filter(|p| p.exists()) {
        return Some(path);
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/fdv/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }
    None
}

/// Read a TOML config file
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    TomlConfig::parse(&content)
}

/// Load the platform config file, if one exists and parses
pub fn load_toml_config() -> Option<TomlConfig> {
    let path = config_file_path()?;
    match read_toml_config(&path) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Skipping config file {}: {}", path.display(), e);
            None
        }
    }
}

/// OS-dependent default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("fdv"))
        .unwrap_or_else(|| PathBuf::from("./fdv_data"))
}

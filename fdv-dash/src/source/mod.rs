//! Pipeline response sources
//!
//! The dashboard never computes forecasts; it loads responses the pipeline
//! already produced. A load that fails is logged and replaced by
//! [`placeholder_payload`], which normalizes to an empty Unknown result.

use anyhow::{bail, Context, Result};
use fdv_common::config::{DashboardConfig, SourceKind};
use fdv_common::ResponseType;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

pub mod mock;

/// File read when no per-type file exists
pub const FALLBACK_FILE: &str = "incoming-data.json";

const REMOTE_TIMEOUT: Duration = Duration::from_secs(15);

/// Where responses come from
#[derive(Debug, Clone)]
pub enum DataSource {
    /// `<dir>/<response-type>.json`, else `<dir>/incoming-data.json`
    StaticFile { dir: PathBuf },
    /// Built-in samples
    Mock,
    /// Latest matching row of `forecast_response`
    Database(SqlitePool),
    /// `GET <base_url>/<response-type>.json`
    Remote {
        client: reqwest::Client,
        base_url: String,
    },
}

impl DataSource {
    /// Remote source with the default client settings
    pub fn remote(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fdv-dash/", env!("CARGO_PKG_VERSION")))
            .timeout(REMOTE_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(DataSource::Remote {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the source named by the configuration
    ///
    /// `pool` is required for [`SourceKind::Database`].
    pub fn from_config(config: &DashboardConfig, pool: Option<SqlitePool>) -> Result<Self> {
        match config.data_source {
            SourceKind::Static => Ok(DataSource::StaticFile {
                dir: config.data_dir.clone(),
            }),
            SourceKind::Mock => Ok(DataSource::Mock),
            SourceKind::Database => match pool {
                Some(pool) => Ok(DataSource::Database(pool)),
                None => bail!("Database source selected but no database is available"),
            },
            SourceKind::Remote => match config.remote_url.as_deref() {
                Some(url) => Self::remote(url),
                None => bail!("Remote source selected but no remote URL is configured"),
            },
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            DataSource::StaticFile { .. } => SourceKind::Static,
            DataSource::Mock => SourceKind::Mock,
            DataSource::Database(_) => SourceKind::Database,
            DataSource::Remote { .. } => SourceKind::Remote,
        }
    }

    /// Load the raw response for `response_type`
    pub async fn load(&self, response_type: ResponseType) -> Result<Value> {
        match self {
            DataSource::StaticFile { dir } => load_static(dir, response_type).await,
            DataSource::Mock => Ok(mock::sample_payload(response_type)),
            DataSource::Database(pool) => {
                let row = fdv_common::db::latest_forecast_response(pool, response_type)
                    .await
                    .with_context(|| format!("Failed to read saved {} response", response_type))?;
                match row {
                    Some(row) => {
                        debug!("Loaded saved {} response #{}", response_type, row.id);
                        Ok(row.payload)
                    }
                    None => bail!("No saved {} response", response_type),
                }
            }
            DataSource::Remote { client, base_url } => {
                let url = format!("{}/{}.json", base_url, response_type.as_str());
                debug!(url = %url, "Fetching remote response");
                let payload = client
                    .get(&url)
                    .send()
                    .await
                    .with_context(|| format!("Request to {} failed", url))?
                    .error_for_status()
                    .with_context(|| format!("{} returned an error status", url))?
                    .json::<Value>()
                    .await
                    .with_context(|| format!("{} did not return JSON", url))?;
                Ok(payload)
            }
        }
    }

    /// Load, substituting the placeholder on any failure
    pub async fn load_or_placeholder(&self, response_type: ResponseType) -> Value {
        match self.load(response_type).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(
                    "Failed to load {} response from {} source: {:#}",
                    response_type,
                    self.kind(),
                    e
                );
                placeholder_payload()
            }
        }
    }
}

async fn load_static(dir: &Path, response_type: ResponseType) -> Result<Value> {
    let per_type = dir.join(format!("{}.json", response_type.as_str()));
    let path = if tokio::fs::try_exists(&per_type).await.unwrap_or(false) {
        per_type
    } else {
        dir.join(FALLBACK_FILE)
    };

    let content = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let payload = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    Ok(payload)
}

/// Shown when nothing could be loaded
pub fn placeholder_payload() -> Value {
    json!({
        "summary": "No data available",
        "results": {}
    })
}

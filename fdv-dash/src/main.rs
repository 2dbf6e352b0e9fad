//! fdv-dash - Forecast Dashboard Viewer service
//!
//! Serves normalized views of pre-computed forecast pipeline responses and
//! saved campaign orchestration results. Never writes to the database unless
//! started with `--init-db`.

use anyhow::{Context, Result};
use clap::Parser;
use fdv_common::config::{DashboardConfig, Overrides};
use fdv_dash::source::DataSource;
use fdv_dash::{build_router, AppState};
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments; each one overrides its FDV_* variable and the
/// config file
#[derive(Parser, Debug)]
#[command(name = "fdv-dash")]
#[command(about = "Forecast Dashboard Viewer service")]
#[command(version)]
struct Args {
    /// Data source: static, mock, database or remote
    #[arg(short = 's', long)]
    data_source: Option<String>,

    /// Directory holding <response-type>.json files for the static source
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// SQLite database with saved responses
    #[arg(long)]
    database: Option<PathBuf>,

    /// Base URL for the remote source
    #[arg(long)]
    remote_url: Option<String>,

    /// Address to bind
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,

    /// Create the database and its tables if missing, then continue
    #[arg(long)]
    init_db: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            data_source: self.data_source.clone(),
            data_dir: self.data_dir.clone(),
            database: self.database.clone(),
            remote_url: self.remote_url.clone(),
            bind: self.bind.clone(),
            port: self.port,
            log_level: self.log_level.clone(),
        }
    }
}

/// RUST_LOG wins over the configured level
fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Start at info so config warnings are visible; the configured level is
    // applied once the config file has been read
    let (filter, filter_handle) = reload::Layer::new(log_filter("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Forecast Dashboard Viewer (fdv-dash) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = DashboardConfig::resolve(&args.overrides());
    filter_handle
        .reload(log_filter(&config.log_level))
        .context("Failed to apply log level")?;

    info!("Data source: {}", config.data_source);
    info!("Database path: {}", config.database.display());

    if args.init_db {
        let pool = fdv_common::db::init_database(&config.database)
            .await
            .context("Failed to initialize database")?;
        pool.close().await;
    }

    let pool = if config.database.exists() {
        match fdv_dash::db::connect_readonly(&config.database).await {
            Ok(pool) => {
                info!("✓ Connected to database (read-only)");
                Some(pool)
            }
            Err(e) => {
                warn!("Database unavailable, campaign results disabled: {:#}", e);
                None
            }
        }
    } else {
        info!("No database found; campaign results disabled");
        None
    };

    let source = match DataSource::from_config(&config, pool.clone()) {
        Ok(source) => source,
        Err(e) => {
            error!("Failed to set up {} data source: {:#}", config.data_source, e);
            return Err(e);
        }
    };

    let app = build_router(AppState::new(source, pool));

    let addr = format!("{}:{}", config.bind, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("fdv-dash listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}

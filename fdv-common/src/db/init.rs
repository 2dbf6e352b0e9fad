//! Database initialization
//!
//! Creates the database file and its tables on first run. Safe to call on an
//! existing database: every statement is `IF NOT EXISTS`.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Open (creating if needed) the database at `db_path` and ensure the schema
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL lets the dashboard read while the pipeline writes
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables and indexes on an already-open pool
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_forecast_response_table(pool).await?;
    create_campaign_result_table(pool).await?;
    Ok(())
}

/// Saved forecast pipeline responses
///
/// `payload` holds the response envelope as JSON text; `response_type` is the
/// kebab-case request type it answered (e.g. `top-demand-items`).
async fn create_forecast_response_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS forecast_response (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            response_type TEXT NOT NULL,
            payload TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_forecast_response_type_created \
         ON forecast_response(response_type, created_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Saved campaign orchestration results
async fn create_campaign_result_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS campaign_result (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            campaign_name TEXT,
            start_date TEXT,
            end_date TEXT,
            agent_response TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_campaign_result_created \
         ON campaign_result(created_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

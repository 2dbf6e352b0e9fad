//! Read-only database access for the dashboard
//!
//! The pipeline owns the database; the dashboard only reads saved responses.

use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;

/// Connect to an existing database in read-only mode
pub async fn connect_readonly(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        anyhow::bail!(
            "Database not found: {}\nRun `fdv-dash --init-db` or let the pipeline create it first.",
            db_path.display()
        );
    }

    // mode=ro: SQLite rejects every write on these connections
    let db_url = format!("sqlite://{}?mode=ro", db_path.display());

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await
        .context("Failed to connect to database in read-only mode")?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_database_is_error() {
        let dir = TempDir::new().unwrap();
        let err = connect_readonly(&dir.path().join("absent.db")).await.unwrap_err();
        assert!(err.to_string().contains("Database not found"));
    }

    #[tokio::test]
    async fn test_readonly_connection_rejects_writes() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("fdv.db");
        let writer = fdv_common::db::init_database(&db_path).await.unwrap();
        writer.close().await;

        let pool = connect_readonly(&db_path).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM campaign_result")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);

        let write = sqlx::query("INSERT INTO campaign_result (agent_response) VALUES ('{}')")
            .execute(&pool)
            .await;
        assert!(write.is_err(), "Write operation should fail in read-only mode");
    }
}

//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    /// Configured data source kind (`static`, `mock`, `database`, `remote`)
    pub data_source: String,
    /// Whether saved campaign results can be served
    pub campaigns: bool,
}

/// GET /health
///
/// Answers from configuration only; it never loads a payload, so it stays
/// fast even when the remote or database backend is down.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        module: "fdv-dash",
        version: env!("CARGO_PKG_VERSION"),
        data_source: state.source.kind().to_string(),
        campaigns: state.campaigns.is_some(),
    })
}

/// Routes that stay public and cheap
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

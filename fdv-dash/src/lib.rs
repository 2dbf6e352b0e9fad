//! fdv-dash library - Forecast Dashboard Viewer service
//!
//! Read-only HTTP service that loads pre-computed forecast pipeline responses,
//! normalizes them, and serves dashboard view models as JSON.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod pagination;
pub mod source;

use source::DataSource;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Where forecast responses are loaded from
    pub source: DataSource,
    /// Read-only pool for saved campaign results, when a database exists
    pub campaigns: Option<SqlitePool>,
}

impl AppState {
    pub fn new(source: DataSource, campaigns: Option<SqlitePool>) -> Self {
        Self { source, campaigns }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let routes = Router::new()
        .route("/api/buildinfo", get(api::get_build_info))
        .route("/api/response-types", get(api::get_response_types))
        .route("/api/forecast", get(api::get_forecast))
        .route("/api/forecast/anomalies", get(api::get_anomalies))
        .route("/api/forecast/explain", get(api::get_explain))
        .route("/api/campaigns", get(api::list_campaigns))
        .route("/api/campaigns/:id", get(api::get_campaign));

    Router::new()
        .merge(routes)
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Local dashboards fetch from another origin during development
        .layer(CorsLayer::permissive())
}

//! HTTP API handlers for fdv-dash

pub mod buildinfo;
pub mod campaign;
pub mod error;
pub mod forecast;
pub mod health;

pub use buildinfo::get_build_info;
pub use campaign::{get_campaign, list_campaigns};
pub use error::ApiError;
pub use forecast::{get_anomalies, get_explain, get_forecast, get_response_types};
pub use health::health_routes;

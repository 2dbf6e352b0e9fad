//! API error responses
//!
//! Every error body is `{"error": message}`. Backend failures never reach
//! this type; handlers degrade to placeholder data instead.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Dashboard API errors
#[derive(Debug)]
pub enum ApiError {
    InvalidParameter(String),
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidParameter(msg) => {
                (StatusCode::BAD_REQUEST, format!("Invalid parameter: {}", msg))
            }
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, format!("Not found: {}", what)),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

//! # FDV Common Library
//!
//! Shared code for the Forecast Dashboard Viewer including:
//! - Response envelope types and structural classification
//! - Record normalization into the common tabular view model
//! - Derived view-model helpers (inventory status, summary stats, sorting)
//! - Campaign orchestration view model
//! - Configuration loading
//! - SQLite storage of saved pipeline responses

pub mod campaign;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod human_time;
pub mod insights;
pub mod normalize;
pub mod response;
pub mod view;

pub use error::{Error, Result};
pub use normalize::{normalize, normalize_response, NormalizedRecord, NormalizedResult, Secondary};
pub use response::{classify, ClassifiedResponse, Envelope, ResponseType, ResponseVariant};

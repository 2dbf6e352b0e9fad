//! Structural classification of pipeline responses
//!
//! A response is classified by which known key is present in its `results`
//! object, never by the `query_metadata.query_type` label. The label is free
//! text written by the upstream pipeline and can drift from the actual shape.
//!
//! # Priority
//!
//! A payload may carry more than one known key. Keys are tested in the fixed
//! order of [`CLASSIFICATION_ORDER`] and the first match wins:
//!
//! 1. `category_specific_insights` → [`ResponseVariant::ExplainForecast`]
//! 2. `anomaly_data` / `anomalies_detected` → [`ResponseVariant::AnomalyDetection`]
//! 3. `low_demand_risk_items` → [`ResponseVariant::LowDemandRisk`]
//! 4. `regional_analysis` → [`ResponseVariant::RegionalAnalysis`]
//! 5. `forecast_data` → [`ResponseVariant::ForecastData`]
//!
//! Anything else is [`ResponseVariant::Unknown`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ResponseType;

/// Known result shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseVariant {
    ForecastData,
    RegionalAnalysis,
    AnomalyDetection,
    LowDemandRisk,
    ExplainForecast,
    /// Single-item forecast; same shape as `ForecastData`
    SpecificItem,
    Unknown,
}

/// Result keys in classification priority order
pub const CLASSIFICATION_ORDER: &[(ResponseVariant, &[&str])] = &[
    (ResponseVariant::ExplainForecast, &["category_specific_insights"]),
    (ResponseVariant::AnomalyDetection, &["anomaly_data", "anomalies_detected"]),
    (ResponseVariant::LowDemandRisk, &["low_demand_risk_items"]),
    (ResponseVariant::RegionalAnalysis, &["regional_analysis"]),
    (ResponseVariant::ForecastData, &["forecast_data"]),
];

/// Classify a raw response by the key set of its `results` object
///
/// Never fails: non-object payloads, a missing `results` or a `results`
/// that is not an object all classify as [`ResponseVariant::Unknown`].
///
/// # Examples
///
/// ```
/// use fdv_common::response::{classify, ResponseVariant};
/// use serde_json::json;
///
/// let raw = json!({ "summary": "", "results": { "regional_analysis": [] } });
/// assert_eq!(classify(&raw), ResponseVariant::RegionalAnalysis);
///
/// assert_eq!(classify(&json!("not an object")), ResponseVariant::Unknown);
/// ```
pub fn classify(raw: &Value) -> ResponseVariant {
    let Some(results) = results_of(raw) else {
        return ResponseVariant::Unknown;
    };

    CLASSIFICATION_ORDER
        .iter()
        .find(|(_, keys)| keys.iter().any(|key| results.contains_key(*key)))
        .map(|(variant, _)| *variant)
        .unwrap_or(ResponseVariant::Unknown)
}

pub(crate) fn results_of(raw: &Value) -> Option<&Map<String, Value>> {
    raw.get("results").and_then(Value::as_object)
}

impl ResponseVariant {
    /// Result keys this variant reads its payload from
    pub fn result_keys(self) -> &'static [&'static str] {
        let lookup = match self {
            ResponseVariant::SpecificItem => ResponseVariant::ForecastData,
            other => other,
        };
        CLASSIFICATION_ORDER
            .iter()
            .find(|(variant, _)| *variant == lookup)
            .map(|(_, keys)| *keys)
            .unwrap_or(&[])
    }

    /// Narrow a structural classification using the requested response type
    ///
    /// Single-item forecasts share the `forecast_data` shape, so structure
    /// alone cannot tell them apart. When the caller asked for
    /// [`ResponseType::SpecificItem`], a `ForecastData` classification is
    /// reported as `SpecificItem`. Every other combination is unchanged.
    pub fn refine(self, requested: ResponseType) -> Self {
        match (self, requested) {
            (ResponseVariant::ForecastData, ResponseType::SpecificItem) => {
                ResponseVariant::SpecificItem
            }
            (variant, _) => variant,
        }
    }

    /// Whether the variant flattens into table rows
    ///
    /// Anomaly and explain-forecast responses are kept in their nested form
    /// for dedicated detail views.
    pub fn is_tabular(self) -> bool {
        matches!(
            self,
            ResponseVariant::ForecastData
                | ResponseVariant::SpecificItem
                | ResponseVariant::RegionalAnalysis
                | ResponseVariant::LowDemandRisk
        )
    }
}

/// A response decoded once into its variant, borrowing the variant payload
///
/// Downstream code matches on this exhaustively instead of re-probing the
/// raw JSON for keys.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClassifiedResponse<'a> {
    Forecast {
        items: &'a [Value],
        specific_item: bool,
    },
    RegionalAnalysis(&'a [Value]),
    AnomalyDetection(&'a [Value]),
    LowDemandRisk(&'a [Value]),
    ExplainForecast(&'a Map<String, Value>),
    Unknown,
}

impl<'a> ClassifiedResponse<'a> {
    /// Classify `raw` structurally and decode it
    pub fn decode(raw: &'a Value) -> Self {
        Self::decode_as(raw, classify(raw))
    }

    /// Decode `raw` as the given variant
    ///
    /// A list-shaped variant whose key is missing, or holds something other
    /// than an array, decodes to an empty list.
    pub fn decode_as(raw: &'a Value, variant: ResponseVariant) -> Self {
        let Some(results) = results_of(raw) else {
            return ClassifiedResponse::Unknown;
        };

        let list = |variant: ResponseVariant| -> &'a [Value] {
            variant
                .result_keys()
                .iter()
                .find_map(|key| results.get(*key).and_then(Value::as_array))
                .map(Vec::as_slice)
                .unwrap_or(&[])
        };

        match variant {
            ResponseVariant::ForecastData => ClassifiedResponse::Forecast {
                items: list(variant),
                specific_item: false,
            },
            ResponseVariant::SpecificItem => ClassifiedResponse::Forecast {
                items: list(variant),
                specific_item: true,
            },
            ResponseVariant::RegionalAnalysis => ClassifiedResponse::RegionalAnalysis(list(variant)),
            ResponseVariant::AnomalyDetection => ClassifiedResponse::AnomalyDetection(list(variant)),
            ResponseVariant::LowDemandRisk => ClassifiedResponse::LowDemandRisk(list(variant)),
            ResponseVariant::ExplainForecast => ClassifiedResponse::ExplainForecast(results),
            ResponseVariant::Unknown => ClassifiedResponse::Unknown,
        }
    }

    pub fn variant(&self) -> ResponseVariant {
        match self {
            ClassifiedResponse::Forecast { specific_item: true, .. } => ResponseVariant::SpecificItem,
            ClassifiedResponse::Forecast { .. } => ResponseVariant::ForecastData,
            ClassifiedResponse::RegionalAnalysis(_) => ResponseVariant::RegionalAnalysis,
            ClassifiedResponse::AnomalyDetection(_) => ResponseVariant::AnomalyDetection,
            ClassifiedResponse::LowDemandRisk(_) => ResponseVariant::LowDemandRisk,
            ClassifiedResponse::ExplainForecast(_) => ResponseVariant::ExplainForecast,
            ClassifiedResponse::Unknown => ResponseVariant::Unknown,
        }
    }
}

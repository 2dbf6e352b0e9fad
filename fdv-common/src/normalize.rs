//! Record normalization
//!
//! Maps every tabular response variant onto one row shape,
//! [`NormalizedRecord`], so tables and charts need not know which pipeline
//! query produced the data.
//!
//! # Coercion policy
//!
//! - Numeric fields use "number or zero": numbers pass through, numeric
//!   strings are parsed, and anything else (absent, null, non-numeric text,
//!   non-finite) becomes `0.0`. NaN never reaches a table.
//! - Required string fields degrade to an empty string.
//! - Nothing here returns an error.
//!
//! # Variant mapping
//!
//! | Variant | Rows | Secondary |
//! |---|---|---|
//! | ForecastData / SpecificItem | one per `forecast_data` element | none |
//! | RegionalAnalysis | one per region | region list verbatim |
//! | LowDemandRisk | one per risk item | risk list verbatim |
//! | AnomalyDetection | none | anomaly list verbatim |
//! | ExplainForecast | none | `results` object verbatim |
//! | Unknown | none | none |
//!
//! Confidence is clamped only for low-demand-risk rows; the
//! regional coverage ratio is passed through unclamped.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::response::envelope::summary_of;
use crate::response::{classify, ClassifiedResponse, ResponseVariant};

/// Common display row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub forecasted_demand: f64,
    pub on_hand_inventory: f64,
    pub expected_inventory: f64,
    pub confidence_score: f64,
    pub anomaly_flag: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insight_reasoning: Option<String>,
}

/// Variant-specific detail kept alongside (or instead of) the rows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Secondary {
    RegionalSummary(Vec<Value>),
    RiskItems(Vec<Value>),
    Anomalies(Vec<Value>),
    ExplainDetail(Map<String, Value>),
}

/// Normalizer output; rebuilt from scratch for every payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedResult {
    pub summary: String,
    pub records: Vec<NormalizedRecord>,
    pub variant: ResponseVariant,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<Secondary>,
}

/// Classify `raw` structurally, then normalize it
pub fn normalize_response(raw: &Value) -> NormalizedResult {
    normalize(raw, classify(raw))
}

/// Normalize `raw` as the given variant
///
/// The summary is always preserved. If `variant` does not match the payload
/// (its result key is missing), the record list is simply empty.
pub fn normalize(raw: &Value, variant: ResponseVariant) -> NormalizedResult {
    let summary = summary_of(raw);

    let (records, secondary) = match ClassifiedResponse::decode_as(raw, variant) {
        ClassifiedResponse::Forecast { items, .. } => {
            (items.iter().map(forecast_record).collect(), None)
        }
        ClassifiedResponse::RegionalAnalysis(regions) => (
            regions.iter().map(regional_record).collect(),
            Some(Secondary::RegionalSummary(regions.to_vec())),
        ),
        ClassifiedResponse::LowDemandRisk(items) => (
            items.iter().map(low_demand_risk_record).collect(),
            Some(Secondary::RiskItems(items.to_vec())),
        ),
        ClassifiedResponse::AnomalyDetection(anomalies) => {
            (Vec::new(), Some(Secondary::Anomalies(anomalies.to_vec())))
        }
        ClassifiedResponse::ExplainForecast(results) => {
            (Vec::new(), Some(Secondary::ExplainDetail(results.clone())))
        }
        ClassifiedResponse::Unknown => (Vec::new(), None),
    };

    NormalizedResult {
        summary,
        records,
        variant,
        secondary,
    }
}

fn forecast_record(item: &Value) -> NormalizedRecord {
    NormalizedRecord {
        item: text_or_empty(item.get("item")),
        category: text(item.get("category")),
        region: text_or_empty(item.get("region")),
        sku: text(item.get("sku")),
        forecasted_demand: number_or_zero(item.get("forecasted_demand")),
        on_hand_inventory: number_or_zero(item.get("on_hand_inventory")),
        expected_inventory: number_or_zero(item.get("expected_inventory")),
        confidence_score: number_or_zero(item.get("confidence_score")),
        anomaly_flag: flag(item.get("anomaly_flag")),
        insight_reasoning: text(item.get("insight_reasoning")),
    }
}

fn regional_record(region: &Value) -> NormalizedRecord {
    let name = text_or_empty(region.get("region"));
    let top_categories = region
        .get("top_categories")
        .and_then(Value::as_array)
        .map(|categories| {
            categories
                .iter()
                .map(|c| text_or_empty(c.get("category")))
                .collect::<Vec<_>>()
                .join(", ")
        });

    NormalizedRecord {
        item: name.clone(),
        category: text(region.get("country")),
        region: name,
        sku: None,
        forecasted_demand: number_or_zero(region.get("total_forecasted_demand")),
        on_hand_inventory: number_or_zero(region.get("total_on_hand_inventory")),
        expected_inventory: number_or_zero(region.get("total_expected_inventory")),
        confidence_score: number_or_zero(region.get("coverage_percentage")) / 100.0,
        anomaly_flag: number_or_zero(region.get("anomaly_count")) > 0.0,
        insight_reasoning: top_categories,
    }
}

fn low_demand_risk_record(item: &Value) -> NormalizedRecord {
    let risk_level = text(item.get("risk_level")).filter(|s| !s.is_empty());
    let insight = text(item.get("recommended_action"))
        .filter(|s| !s.is_empty())
        .or_else(|| risk_level.clone());

    NormalizedRecord {
        item: text_or_empty(item.get("item")),
        category: text(item.get("category")),
        region: text_or_empty(item.get("region")),
        sku: text(item.get("sku")),
        forecasted_demand: number_or_zero(item.get("forecasted_demand")),
        // total inventory stands in for on-hand in this variant
        on_hand_inventory: number_or_zero(item.get("total_inventory")),
        expected_inventory: number_or_zero(item.get("expected_inventory")),
        confidence_score: (1.0 - number_or_zero(item.get("risk_score"))).clamp(0.0, 1.0),
        anomaly_flag: risk_level
            .as_deref()
            .is_some_and(|level| level.eq_ignore_ascii_case("critical")),
        insight_reasoning: insight,
    }
}

// ========================================
// Coercion helpers
// ========================================

/// Number-or-zero coercion
///
/// # Examples
///
/// ```
/// use fdv_common::normalize::number_or_zero;
/// use serde_json::json;
///
/// assert_eq!(number_or_zero(Some(&json!(12.5))), 12.5);
/// assert_eq!(number_or_zero(Some(&json!(" 40 "))), 40.0);
/// assert_eq!(number_or_zero(Some(&json!("n/a"))), 0.0);
/// assert_eq!(number_or_zero(Some(&json!(null))), 0.0);
/// assert_eq!(number_or_zero(None), 0.0);
/// ```
pub fn number_or_zero(value: Option<&Value>) -> f64 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().unwrap_or(0.0)
            }
        }
        Some(Value::Bool(true)) => 1.0,
        _ => 0.0,
    };

    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Scalar rendered as text; null, arrays and objects are `None`
pub fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text_or_empty(value: Option<&Value>) -> String {
    text(value).unwrap_or_default()
}

/// Boolean flag; absent or unrecognized values are `false`
fn flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

//! Envelope fields shared by every pipeline response
//!
//! Decoding is lenient: each field is decoded on its own, and a field that is
//! missing or has an unexpected shape falls back to its default instead of
//! failing the whole envelope.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Filters the upstream pipeline applied when producing a response
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FiltersApplied {
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub regions: Option<Vec<String>>,
    #[serde(default)]
    pub seasons: Option<Vec<String>>,
    /// Either a single horizon label or a list of them
    #[serde(default)]
    pub time_horizon: Option<Value>,
    #[serde(default)]
    pub item_name_sku: Option<String>,
    #[serde(default)]
    pub warehouse_id: Option<String>,
}

/// `query_metadata` block
///
/// `query_type` is a human-readable label only. It is never used to decide
/// how a response is mapped; see [`crate::response::classify`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct QueryMetadata {
    #[serde(default)]
    pub query_type: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub filters_applied: FiltersApplied,
}

/// One step of the pipeline's reasoning trace
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ReasoningStep {
    #[serde(default)]
    pub step_number: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub data_sources: Vec<String>,
    #[serde(default)]
    pub calculations: String,
    #[serde(default)]
    pub insights: String,
}

/// Disclosure of external data the pipeline consulted
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ExternalSources {
    #[serde(default)]
    pub external_sources_used: bool,
    #[serde(default)]
    pub external_sources_description: String,
    #[serde(default)]
    pub mock_data_sufficiency: Option<String>,
    #[serde(default)]
    pub additional_data_needed: Vec<String>,
}

/// Actionable recommendation attached to a response
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Recommendation {
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub impact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_items: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_regions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_warehouses: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_products: Option<f64>,
}

/// Typed view over the envelope of a raw response
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Envelope {
    pub summary: String,
    pub query_metadata: Option<QueryMetadata>,
    pub reasoning_steps: Vec<ReasoningStep>,
    pub external_sources_used: Option<ExternalSources>,
    pub recommendations: Vec<Recommendation>,
    pub metadata: Option<Value>,
}

impl Envelope {
    /// Decode the envelope of `raw`, substituting defaults for anything
    /// missing or malformed
    pub fn from_value(raw: &Value) -> Self {
        Self {
            summary: summary_of(raw),
            query_metadata: decode_field(raw, "query_metadata"),
            reasoning_steps: decode_list(raw, "reasoning_steps"),
            external_sources_used: decode_field(raw, "external_sources_used"),
            recommendations: decode_list(raw, "recommendations"),
            metadata: raw.get("metadata").filter(|v| !v.is_null()).cloned(),
        }
    }

    /// Human-readable query label, if the pipeline supplied one
    pub fn query_type(&self) -> Option<&str> {
        self.query_metadata
            .as_ref()
            .map(|m| m.query_type.as_str())
            .filter(|s| !s.is_empty())
    }
}

/// `summary` as a string; anything else degrades to an empty string
pub fn summary_of(raw: &Value) -> String {
    raw.get("summary")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn decode_field<T: DeserializeOwned>(raw: &Value, key: &str) -> Option<T> {
    raw.get(key)
        .filter(|v| !v.is_null())
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

/// Decode each list element independently, skipping elements that do not fit
fn decode_list<T: DeserializeOwned>(raw: &Value, key: &str) -> Vec<T> {
    raw.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_envelope() {
        let raw = json!({
            "query_metadata": {
                "query_type": "Low Demand Risk",
                "timestamp": "2025-06-01T00:00:00Z",
                "filters_applied": { "regions": ["East"], "time_horizon": "Q3" }
            },
            "summary": "Three items at risk",
            "reasoning_steps": [
                { "step_number": 1, "description": "Loaded inventory", "data_sources": ["inventory"],
                  "calculations": "sum", "insights": "ok" }
            ],
            "external_sources_used": {
                "external_sources_used": false,
                "external_sources_description": "none",
                "mock_data_sufficiency": "Sufficient",
                "additional_data_needed": []
            },
            "recommendations": [
                { "priority": "High", "action": "Discount", "rationale": "Overstock", "impact": "Frees space",
                  "affected_items": ["Sunscreen"] }
            ],
            "metadata": { "execution_time_ms": 1200 },
            "results": {}
        });

        let env = Envelope::from_value(&raw);
        assert_eq!(env.summary, "Three items at risk");
        assert_eq!(env.query_type(), Some("Low Demand Risk"));
        assert_eq!(env.reasoning_steps.len(), 1);
        assert_eq!(env.reasoning_steps[0].description, "Loaded inventory");
        assert_eq!(env.recommendations.len(), 1);
        assert_eq!(
            env.recommendations[0].affected_items.as_deref(),
            Some(&["Sunscreen".to_string()][..])
        );
        assert!(env.metadata.is_some());
        let meta = env.query_metadata.unwrap();
        assert_eq!(meta.filters_applied.regions, Some(vec!["East".to_string()]));
        assert_eq!(meta.filters_applied.time_horizon, Some(json!("Q3")));
    }

    #[test]
    fn test_missing_fields_default() {
        let env = Envelope::from_value(&json!({}));
        assert_eq!(env, Envelope::default());
        assert_eq!(env.query_type(), None);
    }

    #[test]
    fn test_malformed_fields_degrade() {
        let raw = json!({
            "summary": 42,
            "reasoning_steps": "not a list",
            "query_metadata": "also wrong",
            "recommendations": [ "bogus", { "priority": "Low", "action": "Wait" } ]
        });

        let env = Envelope::from_value(&raw);
        assert_eq!(env.summary, "");
        assert!(env.reasoning_steps.is_empty());
        assert!(env.query_metadata.is_none());
        // Only the well-formed element survives
        assert_eq!(env.recommendations.len(), 1);
        assert_eq!(env.recommendations[0].action, "Wait");
    }
}

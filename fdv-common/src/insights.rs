//! Derived view-model values for the dashboard
//!
//! Everything here is presentation arithmetic over already-normalized rows
//! or raw detail lists: status bands, summary counters, sorting and
//! grouping. No forecasting happens here.

use serde::Serialize;
use serde_json::{Map, Value};
use std::cmp::Ordering;

use crate::normalize::{number_or_zero, text, NormalizedRecord};
use crate::response::Recommendation;
use crate::view::{SortColumn, SortDirection};

/// Coverage fraction at or above which stock is only "Low", not "Critical"
const LOW_STOCK_RATIO: f64 = 0.8;

// ========================================
// Status bands
// ========================================

/// Inventory status of one row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InventoryStatus {
    Adequate,
    Low,
    Critical,
}

impl InventoryStatus {
    /// Compare on-hand plus expected inventory against forecasted demand
    ///
    /// # Examples
    ///
    /// ```
    /// use fdv_common::insights::InventoryStatus;
    ///
    /// assert_eq!(InventoryStatus::assess(100.0, 60.0, 40.0), InventoryStatus::Adequate);
    /// assert_eq!(InventoryStatus::assess(100.0, 50.0, 30.0), InventoryStatus::Low);
    /// assert_eq!(InventoryStatus::assess(100.0, 50.0, 20.0), InventoryStatus::Critical);
    /// ```
    pub fn assess(forecasted: f64, on_hand: f64, expected: f64) -> Self {
        let total = on_hand + expected;
        if total >= forecasted {
            InventoryStatus::Adequate
        } else if total >= forecasted * LOW_STOCK_RATIO {
            InventoryStatus::Low
        } else {
            InventoryStatus::Critical
        }
    }

    pub fn of(record: &NormalizedRecord) -> Self {
        Self::assess(
            record.forecasted_demand,
            record.on_hand_inventory,
            record.expected_inventory,
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            InventoryStatus::Adequate => "Adequate",
            InventoryStatus::Low => "Low",
            InventoryStatus::Critical => "Critical",
        }
    }
}

/// Confidence score band used for colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            ConfidenceBand::High
        } else if score >= 0.7 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }
}

/// Inventory gap status for explain-forecast category and region cards
///
/// Gap is available inventory minus forecasted demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GapStatus {
    #[serde(rename = "Critical Shortage")]
    CriticalShortage,
    Shortage,
    Balanced,
    #[serde(rename = "Slight Overstock")]
    SlightOverstock,
    Overstock,
}

impl GapStatus {
    pub fn from_gap(gap: f64) -> Self {
        if gap < -100.0 {
            GapStatus::CriticalShortage
        } else if gap < 0.0 {
            GapStatus::Shortage
        } else if gap == 0.0 {
            GapStatus::Balanced
        } else if gap < 50.0 {
            GapStatus::SlightOverstock
        } else {
            GapStatus::Overstock
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GapStatus::CriticalShortage => "Critical Shortage",
            GapStatus::Shortage => "Shortage",
            GapStatus::Balanced => "Balanced",
            GapStatus::SlightOverstock => "Slight Overstock",
            GapStatus::Overstock => "Overstock",
        }
    }
}

/// Anomaly or recommendation severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Case-insensitive label parse
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "critical" => Some(Severity::Critical),
            "high" => Some(Severity::High),
            "medium" => Some(Severity::Medium),
            "low" => Some(Severity::Low),
            _ => None,
        }
    }

    /// Band a numeric severity score in [0, 1]
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            Severity::Critical
        } else if score >= 0.6 {
            Severity::High
        } else if score >= 0.4 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    /// Severity of a raw anomaly: the `severity` label or score, else
    /// `severity_score`
    pub fn of_anomaly(anomaly: &Value) -> Option<Self> {
        match anomaly.get("severity") {
            Some(Value::String(label)) => {
                if let Some(severity) = Severity::parse(label) {
                    return Some(severity);
                }
            }
            Some(score @ Value::Number(_)) => {
                return Some(Severity::from_score(number_or_zero(Some(score))));
            }
            _ => {}
        }
        anomaly
            .get("severity_score")
            .filter(|v| v.is_number())
            .map(|v| Severity::from_score(number_or_zero(Some(v))))
    }
}

// ========================================
// Summary counters
// ========================================

/// Summary-tab counters over the normalized rows
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    pub products_analyzed: usize,
    pub total_forecasted_demand: f64,
    /// Mean confidence as a whole percentage; 0 with no rows
    pub average_confidence_pct: i64,
    pub anomaly_count: usize,
}

impl SummaryStats {
    pub fn from_records(records: &[NormalizedRecord]) -> Self {
        let total_forecasted_demand = records.iter().map(|r| r.forecasted_demand).sum();
        let average_confidence_pct = if records.is_empty() {
            0
        } else {
            let sum: f64 = records.iter().map(|r| r.confidence_score).sum();
            (sum / records.len() as f64 * 100.0).round() as i64
        };

        Self {
            products_analyzed: records.len(),
            total_forecasted_demand,
            average_confidence_pct,
            anomaly_count: records.iter().filter(|r| r.anomaly_flag).count(),
        }
    }
}

/// Counters for the anomaly detail view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnomalyOverview {
    pub total: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    /// Anomalies carrying neither a recognizable label nor a score
    pub unrated: usize,
}

impl AnomalyOverview {
    pub fn from_anomalies(anomalies: &[Value]) -> Self {
        let mut overview = AnomalyOverview {
            total: anomalies.len(),
            ..Default::default()
        };
        for anomaly in anomalies {
            match Severity::of_anomaly(anomaly) {
                Some(Severity::Critical) => overview.critical += 1,
                Some(Severity::High) => overview.high += 1,
                Some(Severity::Medium) => overview.medium += 1,
                Some(Severity::Low) => overview.low += 1,
                None => overview.unrated += 1,
            }
        }
        overview
    }
}

/// Totals for the explain-forecast detail view
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExplainOverview {
    pub category_count: usize,
    pub total_forecasted_demand: f64,
    pub total_available_inventory: f64,
    /// Inventory minus demand; negative means shortage
    pub total_gap: f64,
    pub gap_status: GapStatus,
}

impl ExplainOverview {
    /// Sum over `category_specific_insights` of an explain-forecast `results`
    pub fn from_results(results: &Map<String, Value>) -> Self {
        let insights = results
            .get("category_specific_insights")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let total_forecasted_demand: f64 = insights
            .iter()
            .map(|i| number_or_zero(i.get("total_forecasted_demand")))
            .sum();
        let total_available_inventory: f64 = insights
            .iter()
            .map(|i| number_or_zero(i.get("total_available_inventory")))
            .sum();
        let total_gap = total_available_inventory - total_forecasted_demand;

        Self {
            category_count: insights.len(),
            total_forecasted_demand,
            total_available_inventory,
            total_gap,
            gap_status: GapStatus::from_gap(total_gap),
        }
    }
}

// ========================================
// Sorting and grouping
// ========================================

/// Sort rows in place; `None` leaves the order untouched
///
/// Text columns compare lower-cased, missing text as empty. The sort is
/// stable, so equal rows keep their upstream order.
pub fn sort_records(
    records: &mut [NormalizedRecord],
    column: Option<SortColumn>,
    direction: SortDirection,
) {
    let Some(column) = column else {
        return;
    };

    records.sort_by(|a, b| {
        let ordering = compare_by(a, b, column);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn compare_by(a: &NormalizedRecord, b: &NormalizedRecord, column: SortColumn) -> Ordering {
    fn lower(s: Option<&str>) -> String {
        s.unwrap_or_default().to_lowercase()
    }
    fn num(a: f64, b: f64) -> Ordering {
        a.partial_cmp(&b).unwrap_or(Ordering::Equal)
    }

    match column {
        SortColumn::Item => lower(Some(a.item.as_str())).cmp(&lower(Some(b.item.as_str()))),
        SortColumn::Category => lower(a.category.as_deref()).cmp(&lower(b.category.as_deref())),
        SortColumn::Region => lower(Some(a.region.as_str())).cmp(&lower(Some(b.region.as_str()))),
        SortColumn::ForecastedDemand => num(a.forecasted_demand, b.forecasted_demand),
        SortColumn::OnHandInventory => num(a.on_hand_inventory, b.on_hand_inventory),
        SortColumn::ExpectedInventory => num(a.expected_inventory, b.expected_inventory),
        SortColumn::ConfidenceScore => num(a.confidence_score, b.confidence_score),
        SortColumn::InventoryStatus => InventoryStatus::of(a)
            .label()
            .cmp(InventoryStatus::of(b).label()),
    }
}

/// Recommendations bucketed by priority
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecommendationGroups {
    pub critical: Vec<Recommendation>,
    pub high: Vec<Recommendation>,
    pub medium: Vec<Recommendation>,
    pub low: Vec<Recommendation>,
    /// Unrecognized priority labels
    pub other: Vec<Recommendation>,
}

impl RecommendationGroups {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.critical.len() + self.high.len() + self.medium.len() + self.low.len() + self.other.len()
    }
}

pub fn group_recommendations(recommendations: &[Recommendation]) -> RecommendationGroups {
    let mut groups = RecommendationGroups::default();
    for rec in recommendations {
        let bucket = match Severity::parse(&rec.priority) {
            Some(Severity::Critical) => &mut groups.critical,
            Some(Severity::High) => &mut groups.high,
            Some(Severity::Medium) => &mut groups.medium,
            Some(Severity::Low) => &mut groups.low,
            None => &mut groups.other,
        };
        bucket.push(rec.clone());
    }
    groups
}

/// Item name of a raw anomaly, accepting the legacy `item_name` field
pub fn anomaly_item_name(anomaly: &Value) -> String {
    text(anomaly.get("item"))
        .or_else(|| text(anomaly.get("item_name")))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "Unknown Item".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(item: &str, demand: f64, on_hand: f64, expected: f64, confidence: f64) -> NormalizedRecord {
        NormalizedRecord {
            item: item.to_string(),
            region: "East".to_string(),
            forecasted_demand: demand,
            on_hand_inventory: on_hand,
            expected_inventory: expected,
            confidence_score: confidence,
            ..Default::default()
        }
    }

    #[test]
    fn test_inventory_status_boundaries() {
        assert_eq!(InventoryStatus::assess(100.0, 100.0, 0.0), InventoryStatus::Adequate);
        assert_eq!(InventoryStatus::assess(100.0, 80.0, 0.0), InventoryStatus::Low);
        assert_eq!(InventoryStatus::assess(100.0, 79.0, 0.0), InventoryStatus::Critical);
        // zero demand is always covered
        assert_eq!(InventoryStatus::assess(0.0, 0.0, 0.0), InventoryStatus::Adequate);
    }

    #[test]
    fn test_confidence_band() {
        assert_eq!(ConfidenceBand::from_score(0.95), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_score(0.9), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_score(0.7), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_score(0.69), ConfidenceBand::Low);
        assert_eq!(ConfidenceBand::from_score(1.2), ConfidenceBand::High);
    }

    #[test]
    fn test_gap_status() {
        assert_eq!(GapStatus::from_gap(-150.0), GapStatus::CriticalShortage);
        assert_eq!(GapStatus::from_gap(-100.0), GapStatus::Shortage);
        assert_eq!(GapStatus::from_gap(0.0), GapStatus::Balanced);
        assert_eq!(GapStatus::from_gap(49.0), GapStatus::SlightOverstock);
        assert_eq!(GapStatus::from_gap(50.0), GapStatus::Overstock);
        assert_eq!(
            serde_json::to_value(GapStatus::CriticalShortage).unwrap(),
            json!("Critical Shortage")
        );
        assert_eq!(GapStatus::SlightOverstock.label(), "Slight Overstock");
    }

    #[test]
    fn test_severity() {
        assert_eq!(Severity::parse("HIGH"), Some(Severity::High));
        assert_eq!(Severity::parse("urgent"), None);
        assert_eq!(Severity::from_score(0.85), Severity::Critical);
        assert_eq!(Severity::from_score(0.6), Severity::High);
        assert_eq!(Severity::from_score(0.45), Severity::Medium);
        assert_eq!(Severity::from_score(0.1), Severity::Low);

        assert_eq!(Severity::of_anomaly(&json!({ "severity": "Low", "severity_score": 0.9 })), Some(Severity::Low));
        assert_eq!(Severity::of_anomaly(&json!({ "severity": "??", "severity_score": 0.9 })), Some(Severity::Critical));
        assert_eq!(Severity::of_anomaly(&json!({ "item": "A" })), None);
        assert_eq!(Severity::of_anomaly(&json!({ "severity": 0.65 })), Some(Severity::High));
        assert_eq!(Severity::of_anomaly(&json!({ "severity": 0.1, "severity_score": 0.9 })), Some(Severity::Low));
    }

    #[test]
    fn test_summary_stats() {
        let mut flagged = record("B", 50.0, 10.0, 10.0, 0.7);
        flagged.anomaly_flag = true;
        let records = vec![record("A", 150.0, 100.0, 50.0, 0.9), flagged];

        let stats = SummaryStats::from_records(&records);
        assert_eq!(stats.products_analyzed, 2);
        assert_eq!(stats.total_forecasted_demand, 200.0);
        assert_eq!(stats.average_confidence_pct, 80);
        assert_eq!(stats.anomaly_count, 1);
    }

    #[test]
    fn test_summary_stats_empty() {
        let stats = SummaryStats::from_records(&[]);
        assert_eq!(stats.products_analyzed, 0);
        assert_eq!(stats.total_forecasted_demand, 0.0);
        assert_eq!(stats.average_confidence_pct, 0);
    }

    #[test]
    fn test_sort_by_text_is_case_insensitive() {
        let mut records = vec![
            record("banana", 1.0, 0.0, 0.0, 0.0),
            record("Apple", 2.0, 0.0, 0.0, 0.0),
            record("cherry", 3.0, 0.0, 0.0, 0.0),
        ];
        sort_records(&mut records, Some(SortColumn::Item), SortDirection::Asc);
        let items: Vec<_> = records.iter().map(|r| r.item.as_str()).collect();
        assert_eq!(items, vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_sort_numeric_descending() {
        let mut records = vec![
            record("A", 10.0, 0.0, 0.0, 0.5),
            record("B", 30.0, 0.0, 0.0, 0.9),
            record("C", 20.0, 0.0, 0.0, 0.7),
        ];
        sort_records(&mut records, Some(SortColumn::ForecastedDemand), SortDirection::Desc);
        let items: Vec<_> = records.iter().map(|r| r.item.as_str()).collect();
        assert_eq!(items, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_sort_missing_category_first() {
        let mut with_category = record("A", 0.0, 0.0, 0.0, 0.0);
        with_category.category = Some("Outdoor".to_string());
        let mut records = vec![with_category, record("B", 0.0, 0.0, 0.0, 0.0)];
        sort_records(&mut records, Some(SortColumn::Category), SortDirection::Asc);
        assert_eq!(records[0].item, "B");
    }

    #[test]
    fn test_sort_by_inventory_status_label() {
        let mut records = vec![
            record("low", 100.0, 85.0, 0.0, 0.0),
            record("critical", 100.0, 10.0, 0.0, 0.0),
            record("adequate", 100.0, 100.0, 0.0, 0.0),
        ];
        sort_records(&mut records, Some(SortColumn::InventoryStatus), SortDirection::Asc);
        let items: Vec<_> = records.iter().map(|r| r.item.as_str()).collect();
        assert_eq!(items, vec!["adequate", "critical", "low"]);
    }

    #[test]
    fn test_sort_none_keeps_order() {
        let mut records = vec![record("B", 2.0, 0.0, 0.0, 0.0), record("A", 1.0, 0.0, 0.0, 0.0)];
        let before = records.clone();
        sort_records(&mut records, None, SortDirection::Desc);
        assert_eq!(records, before);
    }

    #[test]
    fn test_group_recommendations() {
        let rec = |priority: &str, action: &str| Recommendation {
            priority: priority.to_string(),
            action: action.to_string(),
            ..Default::default()
        };
        let groups = group_recommendations(&[
            rec("Critical", "a"),
            rec("high", "b"),
            rec("HIGH", "c"),
            rec("Low", "d"),
            rec("someday", "e"),
        ]);

        assert_eq!(groups.critical.len(), 1);
        assert_eq!(groups.high.len(), 2);
        assert!(groups.medium.is_empty());
        assert_eq!(groups.low.len(), 1);
        assert_eq!(groups.other[0].action, "e");
        assert_eq!(groups.len(), 5);
        assert!(group_recommendations(&[]).is_empty());
    }

    #[test]
    fn test_anomaly_overview() {
        let anomalies = vec![
            json!({ "item": "A", "severity": "Critical" }),
            json!({ "item": "B", "severity": "high" }),
            json!({ "item": "C", "severity_score": 0.5 }),
            json!({ "item": "D" }),
        ];
        let overview = AnomalyOverview::from_anomalies(&anomalies);
        assert_eq!(overview.total, 4);
        assert_eq!(overview.critical, 1);
        assert_eq!(overview.high, 1);
        assert_eq!(overview.medium, 1);
        assert_eq!(overview.low, 0);
        assert_eq!(overview.unrated, 1);
    }

    #[test]
    fn test_explain_overview() {
        let results = json!({ "category_specific_insights": [
            { "category": "Beachwear", "total_forecasted_demand": 1000, "total_available_inventory": 800 },
            { "category": "Outdoor", "total_forecasted_demand": "500", "total_available_inventory": 550 }
        ]});
        let overview = ExplainOverview::from_results(results.as_object().unwrap());
        assert_eq!(overview.category_count, 2);
        assert_eq!(overview.total_forecasted_demand, 1500.0);
        assert_eq!(overview.total_available_inventory, 1350.0);
        assert_eq!(overview.total_gap, -150.0);
        assert_eq!(overview.gap_status, GapStatus::CriticalShortage);
    }

    #[test]
    fn test_anomaly_item_name_fallbacks() {
        assert_eq!(anomaly_item_name(&json!({ "item": "Cooler" })), "Cooler");
        assert_eq!(anomaly_item_name(&json!({ "item_name": "Legacy" })), "Legacy");
        assert_eq!(anomaly_item_name(&json!({})), "Unknown Item");
    }
}

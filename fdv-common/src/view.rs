//! Explicit dashboard view state
//!
//! Theme, selected tab and table sort order are plain values passed with each
//! request rather than process-wide state. Parsing is forgiving: unknown
//! values fall back to defaults.

use serde::{Deserialize, Serialize};

/// Colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("light") => Theme::Light,
            _ => Theme::Dark,
        }
    }
}

/// Forecast dashboard tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardTab {
    #[default]
    Summary,
    Charts,
    Analysis,
    Details,
    Recommendations,
}

impl DashboardTab {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("charts") => DashboardTab::Charts,
            Some("analysis") => DashboardTab::Analysis,
            Some("details") => DashboardTab::Details,
            Some("recommendations") => DashboardTab::Recommendations,
            _ => DashboardTab::Summary,
        }
    }
}

/// Sortable table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Item,
    Category,
    Region,
    ForecastedDemand,
    OnHandInventory,
    ExpectedInventory,
    ConfidenceScore,
    InventoryStatus,
}

impl SortColumn {
    /// Parse a column name; unknown columns are `None` (table left unsorted)
    pub fn parse(value: &str) -> Option<Self> {
        let column = match value.trim() {
            "item" => SortColumn::Item,
            "category" => SortColumn::Category,
            "region" => SortColumn::Region,
            "forecasted_demand" => SortColumn::ForecastedDemand,
            "on_hand_inventory" => SortColumn::OnHandInventory,
            "expected_inventory" => SortColumn::ExpectedInventory,
            "confidence_score" => SortColumn::ConfidenceScore,
            "inventory_status" => SortColumn::InventoryStatus,
            _ => return None,
        };
        Some(column)
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}

/// View state for one dashboard request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewState {
    pub theme: Theme,
    pub tab: DashboardTab,
    pub sort: Option<SortColumn>,
    pub direction: SortDirection,
}

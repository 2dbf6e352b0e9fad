//! Response type selector
//!
//! The dashboard is opened for one kind of pipeline query at a time, chosen
//! with a `type` parameter. Unrecognized or missing values fall back to
//! [`ResponseType::TopDemandItems`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of pipeline query the dashboard is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseType {
    AnomalyDetection,
    ExplainForecast,
    #[default]
    TopDemandItems,
    SpecificItem,
    LowDemandRisk,
    RegionalAnalysis,
}

impl ResponseType {
    /// All response types in menu order
    pub const ALL: [ResponseType; 6] = [
        ResponseType::AnomalyDetection,
        ResponseType::ExplainForecast,
        ResponseType::TopDemandItems,
        ResponseType::SpecificItem,
        ResponseType::LowDemandRisk,
        ResponseType::RegionalAnalysis,
    ];

    /// Wire name, also used as the static data file stem
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseType::AnomalyDetection => "anomaly-detection",
            ResponseType::ExplainForecast => "explain-forecast",
            ResponseType::TopDemandItems => "top-demand-items",
            ResponseType::SpecificItem => "specific-item",
            ResponseType::LowDemandRisk => "low-demand-risk",
            ResponseType::RegionalAnalysis => "regional-analysis",
        }
    }

    /// Display heading for the dashboard title
    pub fn heading(self) -> &'static str {
        match self {
            ResponseType::AnomalyDetection => "Anomaly Detection",
            ResponseType::ExplainForecast => "Explain Forecast",
            ResponseType::TopDemandItems => "Top Demand Items",
            ResponseType::SpecificItem => "Forecast for Specific Item",
            ResponseType::LowDemandRisk => "Low Demand Risk Analysis",
            ResponseType::RegionalAnalysis => "Region Demand Analysis",
        }
    }

    /// Parse a `type` parameter
    ///
    /// Surrounding single or double quotes and whitespace are stripped, so
    /// `?type="low-demand-risk"` is accepted. Anything unrecognized yields
    /// the default.
    ///
    /// # Examples
    ///
    /// ```
    /// use fdv_common::response::ResponseType;
    ///
    /// assert_eq!(ResponseType::parse(Some("'regional-analysis'")), ResponseType::RegionalAnalysis);
    /// assert_eq!(ResponseType::parse(Some("bogus")), ResponseType::TopDemandItems);
    /// assert_eq!(ResponseType::parse(None), ResponseType::TopDemandItems);
    /// ```
    pub fn parse(param: Option<&str>) -> Self {
        param
            .map(strip_quotes)
            .and_then(|value| Self::ALL.into_iter().find(|t| t.as_str() == value))
            .unwrap_or_default()
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strip one leading and one trailing quote character, then trim
fn strip_quotes(value: &str) -> &str {
    let value = value.strip_prefix(['"', '\'']).unwrap_or(value);
    let value = value.strip_suffix(['"', '\'']).unwrap_or(value);
    value.trim()
}

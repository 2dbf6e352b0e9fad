//! Forecast dashboard API
//!
//! Each request loads the pipeline response for the requested type, runs it
//! through the classifier and normalizer, and returns the view model. View
//! state (theme, tab, sort) arrives with the request and is echoed back.

use axum::{
    extract::{Query, State},
    Json,
};
use fdv_common::insights::{
    anomaly_item_name, group_recommendations, sort_records, AnomalyOverview, ConfidenceBand,
    ExplainOverview, GapStatus, InventoryStatus, RecommendationGroups, Severity, SummaryStats,
};
use fdv_common::normalize::{number_or_zero, text};
use fdv_common::view::{DashboardTab, SortColumn, SortDirection, Theme, ViewState};
use fdv_common::{
    classify, normalize, ClassifiedResponse, Envelope, NormalizedResult, ResponseType, ResponseVariant,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::error::ApiError;
use crate::pagination::{calculate_pagination, page_slice, PAGE_SIZE};
use crate::AppState;

/// Query parameters for the forecast view
///
/// Everything is optional and forgiving except `page`, which must be an
/// integer when given.
#[derive(Debug, Default, Deserialize)]
pub struct ForecastQuery {
    #[serde(rename = "type")]
    pub response_type: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub theme: Option<String>,
    pub tab: Option<String>,
}

impl ForecastQuery {
    fn view_state(&self) -> ViewState {
        ViewState {
            theme: Theme::parse(self.theme.as_deref()),
            tab: DashboardTab::parse(self.tab.as_deref()),
            sort: self.sort.as_deref().and_then(SortColumn::parse),
            direction: SortDirection::parse(self.order.as_deref()),
        }
    }

    fn page(&self) -> Result<i64, ApiError> {
        match self.page.as_deref().map(str::trim) {
            None | Some("") => Ok(1),
            Some(page) => page
                .parse()
                .map_err(|_| ApiError::InvalidParameter(format!("page must be an integer, got {:?}", page))),
        }
    }
}

/// Status badges for one table row
#[derive(Debug, Serialize)]
pub struct RowInsight {
    pub inventory_status: InventoryStatus,
    pub confidence_band: ConfidenceBand,
}

/// Forecast view model
#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub response_type: ResponseType,
    pub heading: &'static str,
    /// False for anomaly and explain responses, whose rows live in their
    /// detail views
    pub tabular: bool,
    /// Pipeline's own label for the query, if it sent one
    pub query_type: Option<String>,
    pub view: ViewState,
    /// Records hold only the current page, sorted per `view`
    pub result: NormalizedResult,
    /// Parallel to `result.records`
    pub row_insights: Vec<RowInsight>,
    /// Computed over every record, not just this page
    pub stats: SummaryStats,
    pub recommendations: RecommendationGroups,
    pub envelope: Envelope,
    pub total_records: usize,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

/// GET /api/forecast
pub async fn get_forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<ForecastResponse>, ApiError> {
    let response_type = ResponseType::parse(query.response_type.as_deref());
    let view = query.view_state();
    let requested_page = query.page()?;

    let raw = state.source.load_or_placeholder(response_type).await;
    let variant = classify(&raw).refine(response_type);
    let mut result = normalize(&raw, variant);
    debug!(
        "Normalized {} response as {:?} with {} records",
        response_type,
        variant,
        result.records.len()
    );

    let envelope = Envelope::from_value(&raw);
    let stats = SummaryStats::from_records(&result.records);
    let total_records = result.records.len();

    sort_records(&mut result.records, view.sort, view.direction);
    let pagination = calculate_pagination(total_records as i64, requested_page);
    result.records = page_slice(&result.records, pagination).to_vec();

    let row_insights = result
        .records
        .iter()
        .map(|record| RowInsight {
            inventory_status: InventoryStatus::of(record),
            confidence_band: ConfidenceBand::from_score(record.confidence_score),
        })
        .collect();

    Ok(Json(ForecastResponse {
        response_type,
        heading: response_type.heading(),
        tabular: variant.is_tabular(),
        query_type: envelope.query_type().map(str::to_string),
        view,
        result,
        row_insights,
        stats,
        recommendations: group_recommendations(&envelope.recommendations),
        envelope,
        total_records,
        page: pagination.page,
        page_size: PAGE_SIZE,
        total_pages: pagination.total_pages,
    }))
}

/// One anomaly with its resolved name and severity
#[derive(Debug, Serialize)]
pub struct AnomalyEntry {
    pub item: String,
    pub severity: Option<Severity>,
    pub detail: Value,
}

/// Anomaly detail view model
#[derive(Debug, Serialize)]
pub struct AnomalyResponse {
    pub heading: &'static str,
    pub summary: String,
    pub overview: AnomalyOverview,
    pub anomalies: Vec<AnomalyEntry>,
}

/// GET /api/forecast/anomalies
pub async fn get_anomalies(State(state): State<AppState>) -> Json<AnomalyResponse> {
    let response_type = ResponseType::AnomalyDetection;
    let raw = state.source.load_or_placeholder(response_type).await;

    let anomalies: &[Value] = match ClassifiedResponse::decode(&raw) {
        ClassifiedResponse::AnomalyDetection(anomalies) => anomalies,
        _ => &[],
    };

    Json(AnomalyResponse {
        heading: response_type.heading(),
        summary: fdv_common::response::summary_of(&raw),
        overview: AnomalyOverview::from_anomalies(anomalies),
        anomalies: anomalies
            .iter()
            .map(|anomaly| AnomalyEntry {
                item: anomaly_item_name(anomaly),
                severity: Severity::of_anomaly(anomaly),
                detail: anomaly.clone(),
            })
            .collect(),
    })
}

/// Per-category card of the explain view
#[derive(Debug, Serialize)]
pub struct CategoryCard {
    pub category: String,
    pub total_forecasted_demand: f64,
    pub total_available_inventory: f64,
    pub gap: f64,
    pub gap_status: GapStatus,
}

/// Per-region card of the explain view
#[derive(Debug, Serialize)]
pub struct RegionCard {
    pub region: String,
    pub country: Option<String>,
    pub total_forecasted_demand: f64,
    pub total_available_inventory: f64,
    pub gap: f64,
    pub gap_status: GapStatus,
    /// Upstream `inventory_status` when given, else the gap status label
    pub status: String,
}

/// Explain-forecast detail view model
#[derive(Debug, Serialize)]
pub struct ExplainResponse {
    pub heading: &'static str,
    pub summary: String,
    pub variant: ResponseVariant,
    pub overview: ExplainOverview,
    pub categories: Vec<CategoryCard>,
    pub regions: Vec<RegionCard>,
    pub results: Map<String, Value>,
}

/// GET /api/forecast/explain
pub async fn get_explain(State(state): State<AppState>) -> Json<ExplainResponse> {
    let response_type = ResponseType::ExplainForecast;
    let raw = state.source.load_or_placeholder(response_type).await;

    let decoded = ClassifiedResponse::decode(&raw);
    let empty = Map::new();
    let results = match decoded {
        ClassifiedResponse::ExplainForecast(results) => results,
        _ => &empty,
    };

    Json(ExplainResponse {
        heading: response_type.heading(),
        summary: fdv_common::response::summary_of(&raw),
        variant: decoded.variant(),
        overview: ExplainOverview::from_results(results),
        categories: category_cards(results),
        regions: region_cards(results),
        results: results.clone(),
    })
}

/// Upstream `inventory_gap` when present, else inventory minus demand
fn card_gap(entry: &Value, demand: f64, inventory: f64) -> f64 {
    match entry.get("inventory_gap") {
        Some(gap) if !gap.is_null() => number_or_zero(Some(gap)),
        _ => inventory - demand,
    }
}

fn category_cards(results: &Map<String, Value>) -> Vec<CategoryCard> {
    let Some(insights) = results.get("category_specific_insights").and_then(Value::as_array) else {
        return Vec::new();
    };

    insights
        .iter()
        .map(|insight| {
            let demand = number_or_zero(insight.get("total_forecasted_demand"));
            let inventory = number_or_zero(insight.get("total_available_inventory"));
            let gap = card_gap(insight, demand, inventory);
            CategoryCard {
                category: text(insight.get("category")).unwrap_or_default(),
                total_forecasted_demand: demand,
                total_available_inventory: inventory,
                gap,
                gap_status: GapStatus::from_gap(gap),
            }
        })
        .collect()
}

fn region_cards(results: &Map<String, Value>) -> Vec<RegionCard> {
    let Some(regions) = results.get("regional_forecast_summary").and_then(Value::as_array) else {
        return Vec::new();
    };

    regions
        .iter()
        .map(|region| {
            let demand = number_or_zero(region.get("total_forecasted_demand"));
            let inventory = number_or_zero(region.get("total_available_inventory"));
            let gap = card_gap(region, demand, inventory);
            let gap_status = GapStatus::from_gap(gap);
            RegionCard {
                region: text(region.get("region")).unwrap_or_default(),
                country: text(region.get("country")).filter(|c| !c.is_empty()),
                total_forecasted_demand: demand,
                total_available_inventory: inventory,
                gap,
                gap_status,
                status: text(region.get("inventory_status"))
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| gap_status.label().to_string()),
            }
        })
        .collect()
}

/// Request type with its display heading
#[derive(Debug, Serialize)]
pub struct ResponseTypeInfo {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub heading: &'static str,
}

/// GET /api/response-types
pub async fn get_response_types() -> Json<Vec<ResponseTypeInfo>> {
    Json(
        ResponseType::ALL
            .iter()
            .map(|&response_type| ResponseTypeInfo {
                response_type,
                heading: response_type.heading(),
            })
            .collect(),
    )
}

//! Campaign orchestration API
//!
//! Campaign results are optional: without a database the list is empty and
//! `latest` shows the placeholder campaign. Backend failures degrade the same
//! way, with a warning.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use fdv_common::campaign::CampaignView;
use fdv_common::db::{self, CampaignSummary, RECENT_CAMPAIGN_LIMIT};
use tracing::warn;

use super::error::ApiError;
use crate::AppState;

/// GET /api/campaigns
///
/// The most recent saved results, newest first.
pub async fn list_campaigns(State(state): State<AppState>) -> Json<Vec<CampaignSummary>> {
    let Some(pool) = &state.campaigns else {
        return Json(Vec::new());
    };

    match db::recent_campaign_results(pool, RECENT_CAMPAIGN_LIMIT).await {
        Ok(campaigns) => Json(campaigns),
        Err(e) => {
            warn!("Failed to list campaign results: {}", e);
            Json(Vec::new())
        }
    }
}

/// GET /api/campaigns/:id
///
/// `id` is a row id or `latest`.
pub async fn get_campaign(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CampaignView>, ApiError> {
    let now = Utc::now();

    if id.trim().eq_ignore_ascii_case("latest") {
        let Some(pool) = &state.campaigns else {
            return Ok(Json(CampaignView::placeholder(now)));
        };
        let view = match db::latest_campaign_result(pool).await {
            Ok(Some(saved)) => CampaignView::from_saved(&saved, now),
            Ok(None) => CampaignView::placeholder(now),
            Err(e) => {
                warn!("Failed to load latest campaign result: {}", e);
                CampaignView::placeholder(now)
            }
        };
        return Ok(Json(view));
    }

    let id: i64 = id
        .trim()
        .parse()
        .map_err(|_| ApiError::InvalidParameter(format!("campaign id must be an integer or 'latest', got {:?}", id)))?;

    let Some(pool) = &state.campaigns else {
        return Err(ApiError::NotFound(format!("campaign {}", id)));
    };

    match db::campaign_result_by_id(pool, id).await {
        Ok(Some(saved)) => Ok(Json(CampaignView::from_saved(&saved, now))),
        Ok(None) => Err(ApiError::NotFound(format!("campaign {}", id))),
        Err(e) => {
            warn!("Failed to load campaign result {}: {}", id, e);
            Ok(Json(CampaignView::placeholder(now)))
        }
    }
}

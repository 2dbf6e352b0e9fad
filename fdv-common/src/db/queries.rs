//! Saved response queries
//!
//! JSON columns are stored as TEXT and parsed on the way out. A forecast
//! payload that no longer parses is reported as `Error::Json` so callers
//! decide whether to fall back. A campaign row keeps its metadata and carries
//! a null `agent_response` instead.

use crate::campaign::SavedCampaignResponse;
use crate::response::ResponseType;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, SqlitePool};
use tracing::warn;

/// Number of campaign results the campaign page lists
pub const RECENT_CAMPAIGN_LIMIT: i64 = 4;

/// A saved forecast response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponseRow {
    pub id: i64,
    pub created_at: String,
    pub response_type: String,
    pub payload: Value,
}

/// Campaign list entry (no agent response)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CampaignSummary {
    pub id: i64,
    pub created_at: String,
    pub campaign_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(FromRow)]
struct RawForecastRow {
    id: i64,
    created_at: String,
    response_type: String,
    payload: String,
}

impl TryFrom<RawForecastRow> for ForecastResponseRow {
    type Error = Error;

    fn try_from(raw: RawForecastRow) -> Result<Self> {
        Ok(Self {
            id: raw.id,
            created_at: raw.created_at,
            response_type: raw.response_type,
            payload: serde_json::from_str(&raw.payload)?,
        })
    }
}

#[derive(FromRow)]
struct RawCampaignRow {
    id: i64,
    created_at: String,
    campaign_name: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    agent_response: String,
}

impl From<RawCampaignRow> for SavedCampaignResponse {
    fn from(raw: RawCampaignRow) -> Self {
        let agent_response = serde_json::from_str(&raw.agent_response).unwrap_or_else(|e| {
            warn!("Campaign result {} has malformed agent_response JSON: {}", raw.id, e);
            Value::Null
        });

        Self {
            id: raw.id,
            created_at: raw.created_at,
            campaign_name: raw.campaign_name,
            start_date: raw.start_date,
            end_date: raw.end_date,
            agent_response,
        }
    }
}

/// Most recent saved response for a request type
pub async fn latest_forecast_response(
    pool: &SqlitePool,
    response_type: ResponseType,
) -> Result<Option<ForecastResponseRow>> {
    let raw = sqlx::query_as::<_, RawForecastRow>(
        r#"
        SELECT id, created_at, response_type, payload
        FROM forecast_response
        WHERE response_type = ?
        ORDER BY created_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(response_type.as_str())
    .fetch_optional(pool)
    .await?;

    raw.map(ForecastResponseRow::try_from).transpose()
}

/// Newest-first campaign results, at most `limit`
pub async fn recent_campaign_results(pool: &SqlitePool, limit: i64) -> Result<Vec<CampaignSummary>> {
    let rows = sqlx::query_as::<_, CampaignSummary>(
        r#"
        SELECT id, created_at, campaign_name, start_date, end_date
        FROM campaign_result
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(limit.max(0))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Load one campaign result
pub async fn campaign_result_by_id(pool: &SqlitePool, id: i64) -> Result<Option<SavedCampaignResponse>> {
    let raw = sqlx::query_as::<_, RawCampaignRow>(
        r#"
        SELECT id, created_at, campaign_name, start_date, end_date, agent_response
        FROM campaign_result
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(raw.map(SavedCampaignResponse::from))
}

/// Load the newest campaign result
pub async fn latest_campaign_result(pool: &SqlitePool) -> Result<Option<SavedCampaignResponse>> {
    let raw = sqlx::query_as::<_, RawCampaignRow>(
        r#"
        SELECT id, created_at, campaign_name, start_date, end_date, agent_response
        FROM campaign_result
        ORDER BY created_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(raw.map(SavedCampaignResponse::from))
}

/// Save a forecast response; returns the new row id
pub async fn insert_forecast_response(
    pool: &SqlitePool,
    response_type: ResponseType,
    payload: &Value,
) -> Result<i64> {
    let result = sqlx::query("INSERT INTO forecast_response (response_type, payload) VALUES (?, ?)")
        .bind(response_type.as_str())
        .bind(payload.to_string())
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

/// New campaign result to save
#[derive(Debug, Clone, Default)]
pub struct NewCampaignResult<'a> {
    pub campaign_name: Option<&'a str>,
    pub start_date: Option<&'a str>,
    pub end_date: Option<&'a str>,
    pub agent_response: Value,
}

/// Save a campaign result; returns the new row id
pub async fn insert_campaign_result(pool: &SqlitePool, campaign: &NewCampaignResult<'_>) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO campaign_result (campaign_name, start_date, end_date, agent_response)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(campaign.campaign_name)
    .bind(campaign.start_date)
    .bind(campaign.end_date)
    .bind(campaign.agent_response.to_string())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

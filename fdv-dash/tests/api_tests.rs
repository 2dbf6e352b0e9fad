//! Integration tests for fdv-dash API endpoints
//!
//! Forecast endpoints run against the built-in mock source or a temporary
//! static directory; campaign endpoints against an in-memory database.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use fdv_common::db::{create_schema, insert_campaign_result, NewCampaignResult};
use fdv_dash::source::{DataSource, FALLBACK_FILE};
use fdv_dash::{build_router, AppState};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: Empty in-memory database with the full schema
async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Should open in-memory database");
    create_schema(&pool).await.expect("Should create schema");
    pool
}

/// Test helper: App over mock data, no campaign database
fn mock_app() -> axum::Router {
    build_router(AppState::new(DataSource::Mock, None))
}

/// Test helper: GET request
fn test_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app.oneshot(test_request(uri)).await.unwrap();
    let status = response.status();
    (status, extract_json(response.into_body()).await)
}

// =============================================================================
// Health and build info
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (status, body) = get_json(mock_app(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "fdv-dash");
    assert_eq!(body["data_source"], "mock");
    assert_eq!(body["campaigns"], false);
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_buildinfo_endpoint() {
    let (status, body) = get_json(mock_app(), "/api/buildinfo").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["module"], "fdv-dash");
    assert!(body["git_hash"].is_string());
    assert!(body["build_timestamp"].is_string());
}

#[tokio::test]
async fn test_response_types_listing() {
    let (status, body) = get_json(mock_app(), "/api/response-types").await;

    assert_eq!(status, StatusCode::OK);
    let types: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["type"].as_str().unwrap())
        .collect();
    assert_eq!(types.len(), 6);
    assert!(types.contains(&"top-demand-items"));
    assert!(types.contains(&"explain-forecast"));
    assert!(body[0]["heading"].is_string());
}

// =============================================================================
// Forecast view
// =============================================================================

#[tokio::test]
async fn test_forecast_defaults_to_top_demand_items() {
    let (status, body) = get_json(mock_app(), "/api/forecast").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response_type"], "top-demand-items");
    assert_eq!(body["result"]["variant"], "forecast_data");
    assert_eq!(body["tabular"], true);
    assert_eq!(body["total_records"], 3);
    assert_eq!(body["page"], 1);
    assert_eq!(body["total_pages"], 1);
    assert_eq!(body["view"]["theme"], "dark");
    assert_eq!(body["view"]["tab"], "summary");
    assert_eq!(body["stats"]["products_analyzed"], 3);
    assert_eq!(body["stats"]["anomaly_count"], 1);
    assert_eq!(body["recommendations"]["critical"].as_array().unwrap().len(), 1);
    assert_eq!(body["row_insights"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_forecast_for_detail_only_type() {
    let (status, body) = get_json(mock_app(), "/api/forecast?type=anomaly-detection").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["variant"], "anomaly_detection");
    assert_eq!(body["tabular"], false);
    assert_eq!(body["total_records"], 0);
}

#[tokio::test]
async fn test_forecast_sorting_and_view_state() {
    let (status, body) = get_json(
        mock_app(),
        "/api/forecast?type=%22top-demand-items%22&sort=confidence_score&order=desc&theme=light&tab=details",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response_type"], "top-demand-items");
    assert_eq!(body["view"]["theme"], "light");
    assert_eq!(body["view"]["tab"], "details");
    assert_eq!(body["view"]["sort"], "confidence_score");
    assert_eq!(body["view"]["direction"], "desc");

    let items: Vec<&str> = body["result"]["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["item"].as_str().unwrap())
        .collect();
    assert_eq!(items, vec!["Beach Towel", "Camping Lantern", "Sunscreen SPF 50"]);
    assert_eq!(body["row_insights"][2]["inventory_status"], "Critical");
}

#[tokio::test]
async fn test_forecast_specific_item_refinement() {
    let (_, body) = get_json(mock_app(), "/api/forecast?type=specific-item").await;
    assert_eq!(body["result"]["variant"], "specific_item");
    assert_eq!(body["total_records"], 1);
}

#[tokio::test]
async fn test_forecast_regional_and_risk_variants() {
    let (_, regional) = get_json(mock_app(), "/api/forecast?type=regional-analysis").await;
    assert_eq!(regional["result"]["variant"], "regional_analysis");
    assert_eq!(regional["result"]["records"][1]["confidence_score"], 1.2);
    assert_eq!(regional["result"]["secondary"]["kind"], "regional_summary");

    let (_, risk) = get_json(mock_app(), "/api/forecast?type=low-demand-risk").await;
    assert_eq!(risk["result"]["variant"], "low_demand_risk");
    assert_eq!(risk["result"]["records"][0]["anomaly_flag"], true);
    // Empty recommended_action falls back to the risk level
    assert_eq!(risk["result"]["records"][2]["insight_reasoning"], "Low");
}

#[tokio::test]
async fn test_forecast_unknown_type_falls_back() {
    let (status, body) = get_json(mock_app(), "/api/forecast?type=weather").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response_type"], "top-demand-items");
}

#[tokio::test]
async fn test_forecast_invalid_page_is_bad_request() {
    let (status, body) = get_json(mock_app(), "/api/forecast?page=two").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("page"));
}

#[tokio::test]
async fn test_forecast_pagination_over_static_file() {
    let dir = TempDir::new().unwrap();
    let rows: Vec<Value> = (0..250)
        .map(|n| json!({"item": format!("Item {:03}", n), "forecasted_demand": n}))
        .collect();
    std::fs::write(
        dir.path().join("top-demand-items.json"),
        json!({"summary": "Many items", "results": {"forecast_data": rows}}).to_string(),
    )
    .unwrap();

    let app = build_router(AppState::new(
        DataSource::StaticFile {
            dir: dir.path().to_path_buf(),
        },
        None,
    ));

    let (_, body) = get_json(app.clone(), "/api/forecast?page=3").await;
    assert_eq!(body["total_records"], 250);
    assert_eq!(body["total_pages"], 3);
    assert_eq!(body["page"], 3);
    assert_eq!(body["result"]["records"].as_array().unwrap().len(), 50);
    assert_eq!(body["result"]["records"][0]["item"], "Item 200");
    // Stats cover every record, not just the page
    assert_eq!(body["stats"]["products_analyzed"], 250);

    let (_, body) = get_json(app, "/api/forecast?page=99&sort=forecasted_demand&order=desc").await;
    assert_eq!(body["page"], 3);
    assert_eq!(body["result"]["records"][0]["item"], "Item 049");
}

#[tokio::test]
async fn test_forecast_missing_data_shows_placeholder() {
    let dir = TempDir::new().unwrap();
    let app = build_router(AppState::new(
        DataSource::StaticFile {
            dir: dir.path().join("nothing-here"),
        },
        None,
    ));

    let (status, body) = get_json(app, "/api/forecast").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["summary"], "No data available");
    assert_eq!(body["result"]["variant"], "unknown");
    assert_eq!(body["total_records"], 0);
    assert_eq!(body["stats"]["average_confidence_pct"], 0);
}

#[tokio::test]
async fn test_static_fallback_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(FALLBACK_FILE),
        json!({
            "summary": "Everything is in one file",
            "results": {"anomaly_data": [{"item": "Kite", "severity": "High"}]}
        })
        .to_string(),
    )
    .unwrap();
    let app = build_router(AppState::new(
        DataSource::StaticFile {
            dir: dir.path().to_path_buf(),
        },
        None,
    ));

    let (_, body) = get_json(app, "/api/forecast?type=regional-analysis").await;
    assert_eq!(body["result"]["variant"], "anomaly_detection");
    assert_eq!(body["result"]["summary"], "Everything is in one file");
    assert!(body["result"]["records"].as_array().unwrap().is_empty());
}

// =============================================================================
// Anomaly and explain views
// =============================================================================

#[tokio::test]
async fn test_anomaly_view() {
    let (status, body) = get_json(mock_app(), "/api/forecast/anomalies").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overview"]["total"], 3);
    assert_eq!(body["overview"]["critical"], 1);
    assert_eq!(body["overview"]["high"], 1);
    assert_eq!(body["overview"]["low"], 1);
    assert_eq!(body["anomalies"][1]["item"], "Camping Lantern");
    assert_eq!(body["anomalies"][1]["severity"], "High");
}

#[tokio::test]
async fn test_explain_cards_use_upstream_gap() {
    let dir = TempDir::new().unwrap();
    let payload = json!({
        "summary": "Gap reported upstream",
        "results": {
            "category_specific_insights": [
                {"category": "Beachwear", "inventory_gap": -500, "total_forecasted_demand": 1000, "total_available_inventory": 1000}
            ],
            "regional_forecast_summary": [
                {"region": "North", "inventory_gap": -500, "total_forecasted_demand": 1000, "total_available_inventory": 1000}
            ]
        }
    });
    std::fs::write(dir.path().join("explain-forecast.json"), payload.to_string()).unwrap();
    let app = build_router(AppState::new(DataSource::StaticFile { dir: dir.path().to_path_buf() }, None));

    let (status, body) = get_json(app, "/api/forecast/explain").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"][0]["gap"], -500.0);
    assert_eq!(body["categories"][0]["gap_status"], "Critical Shortage");
    assert_eq!(body["regions"][0]["gap"], -500.0);
    assert_eq!(body["regions"][0]["status"], "Critical Shortage");
}

#[tokio::test]
async fn test_explain_view() {
    let (status, body) = get_json(mock_app(), "/api/forecast/explain").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["variant"], "explain_forecast");
    assert_eq!(body["overview"]["category_count"], 2);
    assert_eq!(body["overview"]["total_gap"], -270.0);
    assert_eq!(body["categories"][0]["gap_status"], "Critical Shortage");
    assert_eq!(body["categories"][1]["gap_status"], "Slight Overstock");
    assert_eq!(body["regions"][0]["gap"], -400.0);
    assert_eq!(body["regions"][0]["status"], "Critical Shortage");
    assert_eq!(body["regions"][1]["gap_status"], "Slight Overstock");
    assert_eq!(body["regions"][1]["status"], "Adequate");
    assert!(body["results"]["forecast_data"].is_array());
}

// =============================================================================
// Campaigns
// =============================================================================

#[tokio::test]
async fn test_campaigns_without_database() {
    let (status, body) = get_json(mock_app(), "/api/campaigns").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = get_json(mock_app(), "/api/campaigns/latest").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], Value::Null);
    assert_eq!(body["campaign_name"], "Campaign Orchestration");
    assert_eq!(body["readiness_status"], "Ready to Launch");
    assert_eq!(body["time_ago"], "Just now");
}

#[tokio::test]
async fn test_campaign_list_and_detail() {
    let db = setup_test_db().await;
    let mut ids = Vec::new();
    for (name, status) in [("Spring", "Complete"), ("Summer", "Pending"), ("Autumn", "Failed"), ("Winter", "Partial"), ("Holiday", "Complete")] {
        let id = insert_campaign_result(
            &db,
            &NewCampaignResult {
                campaign_name: Some(name),
                start_date: Some("2025-01-01"),
                end_date: Some("2025-01-31"),
                agent_response: json!({"summary": name, "system_sync_status": status}),
            },
        )
        .await
        .unwrap();
        ids.push(id);
    }
    let app = build_router(AppState::new(DataSource::Mock, Some(db)));

    let (status, list) = get_json(app.clone(), "/api/campaigns").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["campaign_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Holiday", "Winter", "Autumn", "Summer"]);
    assert!(list[0].get("agent_response").is_none());

    let (_, latest) = get_json(app.clone(), "/api/campaigns/latest").await;
    assert_eq!(latest["campaign_name"], "Holiday");

    let (status, detail) = get_json(app.clone(), &format!("/api/campaigns/{}", ids[1])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["campaign_name"], "Summer");
    assert_eq!(detail["sync_status"], "Pending");
    assert_eq!(detail["sync_progress"], 25);
    assert_eq!(detail["readiness_status"], "Not Ready");

    let (status, body) = get_json(app.clone(), "/api/campaigns/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, body) = get_json(app, "/api/campaigns/newest").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("latest"));
}

#[tokio::test]
async fn test_campaign_with_malformed_agent_response_keeps_metadata() {
    let db = setup_test_db().await;
    sqlx::query(
        "INSERT INTO campaign_result (campaign_name, start_date, end_date, agent_response) \
         VALUES ('Summer', '2025-06-15', '2025-06-30', '{truncated')",
    )
    .execute(&db)
    .await
    .unwrap();
    let app = build_router(AppState::new(DataSource::Mock, Some(db)));

    for uri in ["/api/campaigns/1", "/api/campaigns/latest"] {
        let (status, body) = get_json(app.clone(), uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(body["id"], 1, "{}", uri);
        assert_eq!(body["campaign_name"], "Summer");
        assert_eq!(body["start_date"], "2025-06-15");
        assert_eq!(body["end_date"], "2025-06-30");
        assert!(body["last_updated"].is_string());
        assert!(body["output"]["summary"]
            .as_str()
            .unwrap()
            .starts_with("Campaign orchestration completed"));
    }

    let (_, list) = get_json(app, "/api/campaigns").await;
    assert_eq!(list[0]["campaign_name"], "Summer");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let response = mock_app().oneshot(test_request("/api/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

//! Built-in sample payloads
//!
//! One representative pipeline response per request type, used by the
//! `mock` data source for demos and by the API tests.

use fdv_common::ResponseType;
use serde_json::{json, Value};

/// Sample response for `response_type`
pub fn sample_payload(response_type: ResponseType) -> Value {
    match response_type {
        ResponseType::TopDemandItems => top_demand_items(),
        ResponseType::SpecificItem => specific_item(),
        ResponseType::RegionalAnalysis => regional_analysis(),
        ResponseType::LowDemandRisk => low_demand_risk(),
        ResponseType::AnomalyDetection => anomaly_detection(),
        ResponseType::ExplainForecast => explain_forecast(),
    }
}

fn query_metadata(query_type: &str) -> Value {
    json!({
        "query_type": query_type,
        "timestamp": "2025-06-01T12:00:00Z",
        "filters_applied": {
            "categories": ["Beachwear", "Outdoor"],
            "regions": ["Northeast", "Southeast", "West"],
            "time_horizon": "next_30_days"
        }
    })
}

fn external_sources() -> Value {
    json!({
        "external_sources_used": false,
        "external_sources_description": "Forecast derived from internal sales history only.",
        "mock_data_sufficiency": "Sufficient",
        "additional_data_needed": []
    })
}

fn reasoning_steps() -> Value {
    json!([
        {
            "step_number": 1,
            "description": "Aggregated 90 days of point-of-sale history by SKU and region",
            "data_sources": ["sales_history", "inventory_snapshot"],
            "calculations": "Rolling 7-day mean with seasonal index",
            "insights": "Beachwear demand is accelerating ahead of the holiday weekend"
        },
        {
            "step_number": 2,
            "description": "Compared forecast against on-hand and inbound inventory",
            "data_sources": ["inventory_snapshot", "purchase_orders"],
            "calculations": "gap = on_hand + expected - forecast",
            "insights": "Two SKUs fall short of forecast demand"
        }
    ])
}

fn top_demand_items() -> Value {
    json!({
        "query_metadata": query_metadata("Top Demand Items"),
        "summary": "Sunscreen leads forecast demand; inbound stock covers most items except Sunscreen in the Southeast.",
        "reasoning_steps": reasoning_steps(),
        "external_sources_used": external_sources(),
        "results": {
            "forecast_data": [
                {
                    "item": "Sunscreen SPF 50",
                    "sku": "BW-1001",
                    "category": "Beachwear",
                    "region": "Southeast",
                    "forecasted_demand": 1200,
                    "on_hand_inventory": 20,
                    "expected_inventory": 300,
                    "confidence_score": 0.1,
                    "anomaly_flag": true,
                    "insight_reasoning": "Discount 30%"
                },
                {
                    "item": "Beach Towel",
                    "sku": "BW-1040",
                    "category": "Beachwear",
                    "region": "Northeast",
                    "forecasted_demand": 640,
                    "on_hand_inventory": 410,
                    "expected_inventory": 300,
                    "confidence_score": 0.91,
                    "anomaly_flag": false,
                    "insight_reasoning": "Steady seasonal uplift"
                },
                {
                    "item": "Camping Lantern",
                    "sku": "OD-2203",
                    "category": "Outdoor",
                    "region": "West",
                    "forecasted_demand": 380,
                    "on_hand_inventory": 150,
                    "expected_inventory": 160,
                    "confidence_score": 0.78,
                    "anomaly_flag": false,
                    "insight_reasoning": "Festival season in the region"
                }
            ]
        },
        "recommendations": [
            {
                "priority": "Critical",
                "action": "Expedite Sunscreen replenishment to Southeast stores",
                "rationale": "On-hand plus inbound covers about a quarter of forecast demand",
                "impact": "Avoids stock-outs during peak weekend",
                "affected_items": ["Sunscreen SPF 50"],
                "affected_regions": ["Southeast"]
            },
            {
                "priority": "Medium",
                "action": "Rebalance Camping Lantern stock from Northeast to West",
                "rationale": "West forecast exceeds available stock by 18%",
                "impact": "Improves fill rate for the festival period"
            }
        ]
    })
}

fn specific_item() -> Value {
    json!({
        "query_metadata": query_metadata("Specific Item Forecast"),
        "summary": "Beach Towel demand is well covered across warehouses.",
        "reasoning_steps": reasoning_steps(),
        "external_sources_used": external_sources(),
        "results": {
            "forecast_data": [
                {
                    "item": "Beach Towel",
                    "sku": "BW-1040",
                    "category": "Beachwear",
                    "region": "Northeast",
                    "forecasted_demand": 640,
                    "on_hand_inventory": 410,
                    "expected_inventory": 300,
                    "confidence_score": 0.91,
                    "anomaly_flag": false,
                    "insight_reasoning": "Steady seasonal uplift"
                }
            ]
        }
    })
}

fn regional_analysis() -> Value {
    json!({
        "query_metadata": query_metadata("Regional Analysis"),
        "summary": "The Southeast is under-covered while the West carries surplus inventory.",
        "reasoning_steps": reasoning_steps(),
        "external_sources_used": external_sources(),
        "results": {
            "regional_analysis": [
                {
                    "region": "Southeast",
                    "country": "USA",
                    "total_forecasted_demand": 5400,
                    "total_on_hand_inventory": 2100,
                    "total_expected_inventory": 1900,
                    "inventory_gap": -1400,
                    "coverage_percentage": 74,
                    "top_categories": [
                        {"category": "Beachwear", "demand": 3100, "percentage": 57.4},
                        {"category": "Outdoor", "demand": 1200, "percentage": 22.2}
                    ],
                    "items_count": 48,
                    "overstock_items_count": 2,
                    "high_dsi_items_count": 3,
                    "anomaly_count": 4
                },
                {
                    "region": "West",
                    "country": "USA",
                    "total_forecasted_demand": 3900,
                    "total_on_hand_inventory": 3600,
                    "total_expected_inventory": 1100,
                    "inventory_gap": 800,
                    "coverage_percentage": 120,
                    "top_categories": [
                        {"category": "Outdoor", "demand": 2000, "percentage": 51.3}
                    ],
                    "items_count": 36,
                    "overstock_items_count": 9,
                    "high_dsi_items_count": 5,
                    "anomaly_count": 0
                }
            ]
        }
    })
}

fn low_demand_risk() -> Value {
    json!({
        "query_metadata": query_metadata("Low Demand Risk"),
        "summary": "Three items carry excess inventory relative to forecast demand.",
        "reasoning_steps": reasoning_steps(),
        "external_sources_used": external_sources(),
        "results": {
            "low_demand_risk_items": [
                {
                    "item": "Winter Parka",
                    "sku": "OW-3301",
                    "category": "Outerwear",
                    "region": "Southeast",
                    "total_inventory": 900,
                    "expected_inventory": 200,
                    "forecasted_demand": 40,
                    "inventory_gap": 1060,
                    "risk_score": 0.92,
                    "risk_level": "Critical",
                    "high_dsi": "Yes",
                    "overstock": "Yes",
                    "recommended_action": "Clearance markdown 40%"
                },
                {
                    "item": "Snow Boots",
                    "sku": "OW-3350",
                    "category": "Outerwear",
                    "region": "West",
                    "total_inventory": 420,
                    "expected_inventory": 0,
                    "forecasted_demand": 110,
                    "inventory_gap": 310,
                    "risk_score": 0.64,
                    "risk_level": "High",
                    "high_dsi": "Yes",
                    "overstock": "No",
                    "recommended_action": "Transfer to Northeast"
                },
                {
                    "item": "Thermal Mug",
                    "sku": "KT-0900",
                    "category": "Kitchen",
                    "region": "Northeast",
                    "total_inventory": 260,
                    "expected_inventory": 40,
                    "forecasted_demand": 150,
                    "inventory_gap": 150,
                    "risk_score": 0.35,
                    "risk_level": "Low",
                    "high_dsi": "No",
                    "overstock": "No",
                    "recommended_action": ""
                }
            ]
        },
        "recommendations": [
            {
                "priority": "High",
                "action": "Bundle Winter Parka with summer promotions",
                "rationale": "Risk score above 0.9 with high days-of-supply",
                "impact": "Frees warehouse capacity for seasonal stock",
                "affected_products": 1
            }
        ]
    })
}

fn anomaly_detection() -> Value {
    json!({
        "query_metadata": query_metadata("Anomaly Detection"),
        "summary": "Three anomalies detected, one critical demand spike.",
        "reasoning_steps": reasoning_steps(),
        "external_sources_used": external_sources(),
        "results": {
            "anomaly_data": [
                {
                    "item": "Sunscreen SPF 50",
                    "sku": "BW-1001",
                    "category": "Beachwear",
                    "region": "Southeast",
                    "anomaly_type": "Demand Spike",
                    "severity": "Critical",
                    "forecasted_demand": 1200,
                    "on_hand_inventory": 20,
                    "expected_inventory": 300,
                    "inventory_gap": -880,
                    "anomaly_description": "Demand forecast is 4x the trailing average",
                    "potential_causes": ["Heatwave", "Competitor stock-out"],
                    "recommendation": "Expedite replenishment"
                },
                {
                    "item_name": "Camping Lantern",
                    "sku": "OD-2203",
                    "category": "Outdoor",
                    "region": "West",
                    "anomaly_type": "Inventory Imbalance",
                    "severity_score": 0.65,
                    "anomaly_description": "Stock concentrated in a single warehouse"
                },
                {
                    "item": "Thermal Mug",
                    "sku": "KT-0900",
                    "category": "Kitchen",
                    "region": "Northeast",
                    "anomaly_type": "Demand Drop",
                    "severity": "Low",
                    "anomaly_description": "Sales 20% below forecast for two weeks"
                }
            ]
        }
    })
}

fn explain_forecast() -> Value {
    json!({
        "query_metadata": query_metadata("Explain Forecast"),
        "summary": "Beachwear demand is driven by the early heatwave; Outdoor is balanced.",
        "reasoning_steps": reasoning_steps(),
        "external_sources_used": external_sources(),
        "results": {
            "category_specific_insights": [
                {
                    "category": "Beachwear",
                    "total_forecasted_demand": 4200,
                    "total_available_inventory": 3900,
                    "key_drivers": ["Heatwave", "Holiday weekend"],
                    "insight": "Demand up 35% year over year"
                },
                {
                    "category": "Outdoor",
                    "total_forecasted_demand": 1800,
                    "total_available_inventory": 1830,
                    "key_drivers": ["Festival season"],
                    "insight": "Inventory tracks demand closely"
                }
            ],
            "regional_forecast_summary": [
                {
                    "region": "Southeast",
                    "country": "USA",
                    "total_forecasted_demand": 2600,
                    "total_available_inventory": 2200,
                    "top_categories": ["Beachwear"],
                    "key_recommendations": ["Expedite Sunscreen replenishment"]
                },
                {
                    "region": "West",
                    "country": "USA",
                    "total_forecasted_demand": 1400,
                    "total_available_inventory": 1430,
                    "inventory_gap": 30,
                    "inventory_status": "Adequate",
                    "top_categories": ["Outdoor"]
                }
            ],
            "forecast_data": [
                {
                    "item": "Sunscreen SPF 50",
                    "sku": "BW-1001",
                    "category": "Beachwear",
                    "region": "Southeast",
                    "season": "Summer",
                    "forecasted_demand": 1200,
                    "on_hand_inventory": 20,
                    "expected_inventory": 300,
                    "inventory_gap": -880,
                    "confidence_score": 0.1,
                    "anomaly_flag": true,
                    "insight_reasoning": "Discount 30%",
                    "recommendation": "Expedite replenishment"
                }
            ]
        },
        "metadata": {
            "confidence_level": 0.85,
            "data_quality_score": 0.92,
            "data_source": "sales_history",
            "execution_time_ms": 840,
            "total_records_analyzed": 12500
        }
    })
}

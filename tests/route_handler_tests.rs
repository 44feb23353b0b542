// Route handler tests called directly, without the router

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use netmon_hub::routes::{get_poisson, get_rate, get_tickets, health, AppState, PoissonParams};
use netmon_hub::state::DashboardState;
use serde_json::{json, Value};
use std::sync::{Arc, RwLock};

fn app_state(records: &[Value]) -> AppState {
    let mut dashboard = DashboardState::default();
    let now = Utc::now();
    for record in records {
        dashboard.ingest(record, now);
    }
    AppState {
        dashboard: Arc::new(RwLock::new(dashboard)),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

#[tokio::test]
async fn test_health_handler() {
    let state = app_state(&[
        json!({"networkMap": {"A": [], "B": []}, "nodeCordinate": {}, "nodeAttributes": {}}),
        json!({"priority": "p4", "nodeid": "A"}),
    ]);

    let response = health(State(state)).await.into_response();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["nodes"], 2);
    assert_eq!(body["tickets"], 1);
}

#[tokio::test]
async fn test_get_rate_handler_before_any_incident() {
    let state = app_state(&[]);

    let response = get_rate(State(state)).await.into_response();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["value"], 0.0);
    assert_eq!(body["cumulativeCount"], 0);
    assert!(body["windowStart"].is_null());
}

#[tokio::test]
async fn test_get_tickets_handler_formats_timestamp() {
    let state = app_state(&[json!({
        "priority": "p1",
        "nodeid": "N1",
        "heading": "Server Down",
        "description": "Unable to reach host"
    })]);

    let response = get_tickets(State(state)).await.into_response();
    let body = body_json(response).await;
    let tickets = body.as_array().unwrap();

    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0]["title"], "Server Down");
    assert_eq!(tickets[0]["priority"], "Critical");
    assert_eq!(tickets[0]["nodeId"], "N1");
    let timestamp = tickets[0]["timestamp"].as_str().unwrap();
    assert_eq!(timestamp.len(), 8);
    assert_eq!(timestamp.matches(':').count(), 2);
}

#[tokio::test]
async fn test_get_poisson_handler_range() {
    let state = app_state(&[]);

    let response = get_poisson(State(state.clone()), Query(PoissonParams { range: None }))
        .await
        .into_response();
    let body = body_json(response).await;
    assert_eq!(body["range"], 20);
    assert_eq!(body["points"].as_array().unwrap().len(), 20);

    let response = get_poisson(State(state), Query(PoissonParams { range: Some(100_000) }))
        .await
        .into_response();
    let body = body_json(response).await;
    assert_eq!(body["range"], netmon_hub::routes::MAX_POISSON_RANGE);
}

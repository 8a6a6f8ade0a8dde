//! Router tests: read endpoint shape and event submission.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use patrol_api::{build_router, event_channel, run_consumer, AppState, ChannelEventSource};
use patrol_engine::EventSource;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> (Router, AppState, ChannelEventSource) {
    let engine = patrol_api::state::shared_engine();
    let (sender, source) = event_channel(16);
    let state = AppState::new(engine, sender);
    (build_router(state.clone()), state, source)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_event(app: &Router, event: Value) -> StatusCode {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/events")
                .header("content-type", "application/json")
                .body(Body::from(event.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn ping_answers_pong() {
    let (app, _state, _source) = app();
    let response = app
        .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"pong");
}

#[tokio::test]
async fn empty_state_has_null_error() {
    let (app, _state, _source) = app();
    let (status, json) = get_json(&app, "/api/v1/state").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({ "data": { "Incidents": [], "Officers": [] }, "error": null })
    );
}

#[tokio::test]
async fn submitted_events_are_queued_for_the_consumer() {
    let (app, _state, mut source) = app();

    let status = post_event(&app, json!({ "type": "OfficerGoesOffline", "officerId": 1 })).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let payload = source.next_event().await.unwrap();
    let queued: Value = serde_json::from_slice(&payload).unwrap();
    assert_eq!(queued["officerId"], 1);
}

#[tokio::test]
async fn submit_after_consumer_stopped_is_unavailable() {
    let (app, _state, source) = app();
    drop(source);

    let status = post_event(&app, json!({ "type": "OfficerGoesOffline", "officerId": 1 })).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn state_reflects_consumed_events() {
    let (app, state, source) = app();

    for event in [
        json!({ "type": "IncidentOccurred", "incidentId": 10, "codeName": "code", "loc": { "x": 12, "y": 123124 } }),
        json!("garbage"),
        json!({ "type": "OfficerGoesOnline", "officerId": 5, "badgeName": "B5" }),
    ] {
        assert_eq!(post_event(&app, event).await, StatusCode::ACCEPTED);
    }

    // Close the queue so the consumer drains and returns.
    let engine = state.engine.clone();
    drop(state);
    drop(app);
    let received = run_consumer(source, engine.clone()).await;
    assert_eq!(received, 3);

    let (sender, _unused) = event_channel(1);
    let app = build_router(AppState::new(engine, sender));
    let (_, json) = get_json(&app, "/api/v1/state").await;
    assert_eq!(
        json["data"]["Incidents"],
        json!([{ "id": 10, "codeName": "code", "loc": { "x": 12, "y": 123124 }, "officerID": 5 }])
    );
    assert_eq!(
        json["data"]["Officers"],
        json!([{ "id": 5, "badgeName": "B5", "loc": { "x": 0, "y": 0 } }])
    );
}

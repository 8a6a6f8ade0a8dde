use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use patrol_common::{ApiResponse, StateSnapshot};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/health", get(health))
        .route("/api/v1/state", get(current_state))
        .route("/api/v1/events", post(submit_event))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

async fn ping() -> &'static str {
    "pong"
}

async fn health() -> &'static str {
    "ok"
}

async fn current_state(State(state): State<AppState>) -> Json<ApiResponse<StateSnapshot>> {
    let snapshot = state.engine.read().await.snapshot();
    Json(ApiResponse::ok(snapshot))
}

/// Queue a raw event for the consumer. The body is not validated here;
/// malformed payloads are dropped by the consumer like any other.
async fn submit_event(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    match state.events.send(body.to_vec()).await {
        Ok(()) => StatusCode::ACCEPTED.into_response(),
        Err(_) => {
            warn!("Event submitted after consumer stopped");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::<()>::failure(
                    "consumer_unavailable",
                    "event consumer is not running",
                )),
            )
                .into_response()
        }
    }
}

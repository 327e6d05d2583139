use crate::services::get_metrics;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Backend running" }))
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "data-service",
        "version": env!("CARGO_PKG_VERSION"),
        "source": state.source.mode()
    }))
}

pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.source.health_check().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(source = state.source.mode().as_str(), error = %e, "Record source not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}

pub mod auth;
pub mod state;

pub use state::AppState;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use std::time::Duration;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    message: String,
    timestamp: String,
}

pub fn create_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        .route("/health", get(health))
        .route("/verification-key", get(verification_key))
        .route("/authenticate", post(auth::authenticate))
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Zero Knowledge Authentication Server is running".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// The key store is required to build `AppState`, so the key is always
/// present here.
async fn verification_key(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.keys.document().clone())
}

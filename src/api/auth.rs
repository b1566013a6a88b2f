use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;

use crate::api::state::AppState;
use crate::auth::AuthenticateRequest;
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct AuthenticateResponse {
    pub success: bool,
    pub message: String,
    pub authenticated: bool,
}

/// POST /authenticate
pub async fn authenticate(
    State(state): State<AppState>,
    body: Result<Json<AuthenticateRequest>, JsonRejection>,
) -> Result<Json<AuthenticateResponse>, AppError> {
    let Json(req) = body.map_err(|rejection| {
        tracing::debug!("Rejected authentication body: {}", rejection.body_text());
        AppError::from(rejection)
    })?;

    tracing::info!("Received authentication request");

    state.auth.authenticate(req).await.into_result()?;

    Ok(Json(AuthenticateResponse {
        success: true,
        message: "Authentication successful! You proved knowledge of the password without revealing it."
            .to_string(),
        authenticated: true,
    }))
}

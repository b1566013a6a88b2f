use axum::extract::rejection::JsonRejection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Verification key or circuit artifacts missing/corrupt. Fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing or malformed proof / public signals.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The verifier itself failed on structurally invalid input.
    #[error("Verification fault: {0}")]
    Verification(String),

    /// The proof did not demonstrate knowledge of the committed secret.
    #[error("Authentication rejected: {0}")]
    Rejected(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {}", err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

// Axum IntoResponse implementation for HTTP errors
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let (status, body) = match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({
                    "success": false,
                    "message": msg,
                }),
            ),
            AppError::Rejected(_) => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({
                    "success": false,
                    "message": "Authentication failed. Invalid proof.",
                    "authenticated": false,
                }),
            ),
            AppError::Verification(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({
                    "success": false,
                    "message": "Server error during authentication",
                    "error": err,
                }),
            ),
            AppError::Config(err) | AppError::Crypto(err) | AppError::Internal(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({
                    "success": false,
                    "message": "Internal server error",
                    "error": err,
                }),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}

//! Gateway error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Reason given whenever a request carries no live session token
pub const NOT_LOGGED_IN: &str = "Not logged in";

#[derive(Debug, Error)]
pub enum GatewayError {
    /// A required login field was absent from the request
    #[error("{0} missing")]
    MissingField(&'static str),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(&'static str),

    /// The user has a session but no dashboard layout has been provisioned
    #[error("No dashboard configuration for user {0}")]
    ConfigNotFound(i64),

    /// A collaborator answered with a non-success status
    #[error("Collaborator returned {status}")]
    Collaborator { status: StatusCode, body: String },

    #[error("Collaborator unavailable: {0}")]
    Unavailable(String),

    #[error("Collaborator timed out: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn invalid_token() -> Self {
        GatewayError::Unauthorized("Invalid token")
    }

    pub fn not_logged_in() -> Self {
        GatewayError::Unauthorized(NOT_LOGGED_IN)
    }
}

impl From<rusqlite::Error> for GatewayError {
    fn from(e: rusqlite::Error) -> Self {
        GatewayError::Internal(e.to_string())
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Timeout(e.to_string())
        } else {
            GatewayError::Unavailable(e.to_string())
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            GatewayError::MissingField(field) => {
                (StatusCode::UNAUTHORIZED, format!("{} missing", field))
            }
            GatewayError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            GatewayError::Unauthorized(reason) => (StatusCode::UNAUTHORIZED, reason.to_string()),
            GatewayError::ConfigNotFound(user_id) => {
                tracing::error!(user_id, "Dashboard configuration missing");
                (
                    StatusCode::NOT_FOUND,
                    "Dashboard configuration missing".to_string(),
                )
            }
            GatewayError::Collaborator { status, body } => (status, body),
            GatewayError::Unavailable(msg) => {
                tracing::warn!("Collaborator unavailable: {}", msg);
                (StatusCode::BAD_GATEWAY, "Collaborator unavailable".to_string())
            }
            GatewayError::Timeout(msg) => {
                tracing::warn!("Collaborator timed out: {}", msg);
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "Collaborator timed out".to_string(),
                )
            }
            GatewayError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

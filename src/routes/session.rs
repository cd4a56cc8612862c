//! Session endpoints carrying the token in the request body

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, NOT_LOGGED_IN};
use crate::guard::{self, LogoutOutcome};
use crate::provider::ProviderGateway;
use crate::recognition::RecognitionGateway;
use crate::state::AppState;
use crate::store::{SessionStore, UserStore};

#[derive(Deserialize)]
pub struct LogoutRequest {
    #[serde(rename = "Token", alias = "token")]
    pub token: Option<String>,
}

#[derive(Serialize)]
pub struct LogoutResponse {
    #[serde(rename = "Success")]
    pub success: bool,
    #[serde(rename = "Reason", skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

/// POST /logout
pub async fn logout<U, S, R, P>(
    State(state): State<Arc<AppState<U, S, R, P>>>,
    Json(req): Json<LogoutRequest>,
) -> Result<Json<LogoutResponse>, GatewayError>
where
    U: UserStore,
    S: SessionStore,
    R: RecognitionGateway,
    P: ProviderGateway,
{
    let outcome = match req.token {
        Some(token) => guard::logout(state.session_store.as_ref(), &token)?,
        None => LogoutOutcome::NotLoggedIn,
    };

    Ok(Json(match outcome {
        LogoutOutcome::LoggedOut(_) => LogoutResponse {
            success: true,
            reason: None,
        },
        LogoutOutcome::NotLoggedIn => LogoutResponse {
            success: false,
            reason: Some(NOT_LOGGED_IN),
        },
    }))
}

#[derive(Deserialize)]
pub struct TestRequest {
    #[serde(alias = "Token")]
    pub token: Option<String>,
}

#[derive(Serialize)]
pub struct TestResponse {
    #[serde(rename = "Status")]
    pub status: &'static str,
}

/// POST /test
pub async fn test<U, S, R, P>(
    State(state): State<Arc<AppState<U, S, R, P>>>,
    Json(req): Json<TestRequest>,
) -> Result<Json<TestResponse>, GatewayError>
where
    U: UserStore,
    S: SessionStore,
    R: RecognitionGateway,
    P: ProviderGateway,
{
    let token = req
        .token
        .ok_or_else(|| GatewayError::Validation(NOT_LOGGED_IN.to_string()))?;

    guard::validate(state.session_store.as_ref(), Some(&token))?;

    Ok(Json(TestResponse {
        status: "Logged in",
    }))
}

//! Device login endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::dashboard::Widget;
use crate::error::GatewayError;
use crate::flow;
use crate::provider::ProviderGateway;
use crate::recognition::RecognitionGateway;
use crate::state::AppState;
use crate::store::{DeviceId, SessionStore, UserStore};

#[derive(Deserialize)]
pub struct StartSessionRequest {
    #[serde(rename = "DeviceId")]
    pub device_id: Option<i64>,
}

#[derive(Serialize)]
pub struct StartSessionResponse {
    #[serde(rename = "LoginToken")]
    pub login_token: String,
}

/// POST /login/start_session
pub async fn start_session<U, S, R, P>(
    State(state): State<Arc<AppState<U, S, R, P>>>,
    Json(req): Json<StartSessionRequest>,
) -> Result<Json<StartSessionResponse>, GatewayError>
where
    U: UserStore,
    S: SessionStore,
    R: RecognitionGateway,
    P: ProviderGateway,
{
    let device_id = req.device_id.ok_or(GatewayError::MissingField("DeviceId"))?;

    let login_token = flow::start_session(&state, DeviceId(device_id)).await?;

    Ok(Json(StartSessionResponse { login_token }))
}

#[derive(Deserialize)]
pub struct ConfirmRequest {
    #[serde(rename = "LoginToken")]
    pub login_token: Option<String>,
    #[serde(rename = "RecognitionToken")]
    pub recognition_token: Option<String>,
}

#[derive(Serialize)]
pub struct ConfirmResponse {
    #[serde(rename = "Token")]
    pub token: String,
    #[serde(rename = "Widgets")]
    pub widgets: Vec<Widget>,
}

/// POST /login/confirm
pub async fn confirm_session<U, S, R, P>(
    State(state): State<Arc<AppState<U, S, R, P>>>,
    Json(req): Json<ConfirmRequest>,
) -> Result<Json<ConfirmResponse>, GatewayError>
where
    U: UserStore,
    S: SessionStore,
    R: RecognitionGateway,
    P: ProviderGateway,
{
    let login_token = req.login_token.ok_or(GatewayError::MissingField("LoginToken"))?;
    let recognition_token = req
        .recognition_token
        .ok_or(GatewayError::MissingField("RecognitionToken"))?;

    let confirmed = flow::confirm_session(&state, &login_token, &recognition_token).await?;

    Ok(Json(ConfirmResponse {
        token: confirmed.token.0,
        widgets: confirmed.widgets,
    }))
}

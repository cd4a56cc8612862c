//! HTTP client for the recognition service

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::{LoginAttempt, Recognition, RecognitionGateway};
use crate::error::GatewayError;
use crate::store::UserId;

#[derive(Serialize)]
struct AnnounceRequest<'a> {
    #[serde(rename = "MirrorID")]
    mirror_id: i64,
    #[serde(rename = "LoginToken")]
    login_token: &'a str,
    #[serde(rename = "Users")]
    users: Vec<i64>,
}

#[derive(Serialize)]
struct ConfirmRequest<'a> {
    #[serde(rename = "LoginToken")]
    login_token: &'a str,
    #[serde(rename = "RecognitionToken")]
    recognition_token: &'a str,
}

#[derive(Deserialize)]
struct ConfirmResponse {
    #[serde(rename = "UserId")]
    user_id: i64,
}

/// Recognition gateway reached over HTTP
pub struct HttpRecognitionGateway {
    client: Client,
    base_url: String,
}

impl HttpRecognitionGateway {
    /// Create a gateway sharing the process-wide client
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl RecognitionGateway for HttpRecognitionGateway {
    async fn announce(&self, attempt: &LoginAttempt) -> Result<(), GatewayError> {
        let body = AnnounceRequest {
            mirror_id: attempt.device_id.0,
            login_token: &attempt.login_token,
            users: attempt.candidates.iter().map(|u| u.0).collect(),
        };

        let response = self.client.post(self.url("sessions")).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(GatewayError::Collaborator { status, body });
        }

        Ok(())
    }

    async fn confirm(
        &self,
        login_token: &str,
        recognition_token: &str,
    ) -> Result<Recognition, GatewayError> {
        let body = ConfirmRequest {
            login_token,
            recognition_token,
        };

        let response = self.client.post(self.url("confirm")).json(&body).send().await?;

        match response.status() {
            StatusCode::OK => {
                let matched: ConfirmResponse = response.json().await.map_err(|e| {
                    GatewayError::Unavailable(format!("Malformed recognition response: {}", e))
                })?;
                Ok(Recognition::Matched(UserId(matched.user_id)))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                Ok(Recognition::NoMatch)
            }
            status => {
                let body = response.text().await?;
                Err(GatewayError::Collaborator { status, body })
            }
        }
    }
}

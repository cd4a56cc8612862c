//! HTTP client for provider collaborators

use async_trait::async_trait;
use axum::http::StatusCode;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use super::{ProviderGateway, ProviderResponse};
use crate::error::GatewayError;
use crate::store::UserId;

/// Provider reached over HTTP
pub struct HttpProviderGateway {
    name: &'static str,
    client: Client,
    base_url: String,
}

impl HttpProviderGateway {
    /// Create a provider client sharing the process-wide client
    pub fn new(name: &'static str, client: Client, base_url: &str) -> Self {
        Self {
            name,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource.trim_start_matches('/'))
    }
}

#[async_trait]
impl ProviderGateway for HttpProviderGateway {
    async fn is_logged_in(&self, user_id: UserId) -> Result<bool, GatewayError> {
        let url = self.url(&format!("users/{}", user_id.0));
        let response = self.client.get(url).send().await?;
        let status = response.status();

        tracing::debug!(provider = self.name, user_id = user_id.0, %status, "Provider status check");

        Ok(status == StatusCode::OK)
    }

    async fn fetch(&self, resource: &str) -> Result<ProviderResponse, GatewayError> {
        let response = self.client.get(self.url(resource)).send().await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        Ok(ProviderResponse {
            status,
            content_type,
            body,
        })
    }
}

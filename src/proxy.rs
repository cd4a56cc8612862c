//! Provider passthrough for gated resource requests

use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};

use crate::error::GatewayError;
use crate::provider::{ProviderGateway, ProviderResponse};
use crate::store::{Provider, UserId};

/// Per-user resources exposed through the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Timeline,
    Inbox,
    Tasks,
}

impl Resource {
    pub fn provider(&self) -> Provider {
        match self {
            Resource::Timeline => Provider::Timeline,
            Resource::Inbox | Resource::Tasks => Provider::Mail,
        }
    }

    /// Path of the resource relative to its provider's base address
    pub fn path(&self, user_id: UserId) -> String {
        match self {
            Resource::Timeline => format!("users/{}/home_timeline", user_id.0),
            Resource::Inbox => format!("users/{}/emails/inbox", user_id.0),
            Resource::Tasks => format!("users/{}/tasks", user_id.0),
        }
    }
}

/// Fetch a resource for a user, returning the provider body verbatim on
/// success and the provider status with its body wrapped otherwise
pub async fn forward<P: ProviderGateway>(
    gateway: &P,
    resource: Resource,
    user_id: UserId,
) -> Result<Response, GatewayError> {
    let response = gateway.fetch(&resource.path(user_id)).await?;

    tracing::debug!(
        provider = resource.provider().as_str(),
        user_id = user_id.0,
        status = %response.status,
        "Proxied provider request"
    );

    if !response.is_ok() {
        return Err(GatewayError::Collaborator {
            status: response.status,
            body: String::from_utf8_lossy(&response.body).into_owned(),
        });
    }

    Ok(passthrough(response))
}

fn passthrough(response: ProviderResponse) -> Response {
    let content_type = response
        .content_type
        .unwrap_or_else(|| "application/json".to_string());
    ([(CONTENT_TYPE, content_type)], response.body).into_response()
}

//! Third-party provider collaborators
//!
//! Each provider answers two kinds of questions for the gateway: whether a
//! user is currently logged in with it, and the raw content of a per-user
//! resource.

pub mod http;

pub use http::HttpProviderGateway;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::StatusCode;

use crate::error::GatewayError;
use crate::store::UserId;

/// A provider response passed through to the client
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl ProviderResponse {
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }
}

#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// Check whether a user is currently authenticated with the provider
    async fn is_logged_in(&self, user_id: UserId) -> Result<bool, GatewayError>;

    /// Fetch a resource relative to the provider's base address
    async fn fetch(&self, resource: &str) -> Result<ProviderResponse, GatewayError>;
}

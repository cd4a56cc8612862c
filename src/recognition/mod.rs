//! Face-recognition collaborator
//!
//! The recognition service owns the association between a login attempt and
//! the users that may complete it. The gateway only announces attempts and
//! asks it to resolve a (login token, recognition token) pair to a user.

pub mod http;

pub use http::HttpRecognitionGateway;

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::store::{DeviceId, UserId};

/// A login attempt announced to the recognition service
#[derive(Debug, Clone)]
pub struct LoginAttempt {
    pub device_id: DeviceId,
    pub login_token: String,
    /// Users bound to the device, possibly empty
    pub candidates: Vec<UserId>,
}

/// Outcome of a recognition confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recognition {
    Matched(UserId),
    NoMatch,
}

#[async_trait]
pub trait RecognitionGateway: Send + Sync {
    /// Tell the recognition service a new login attempt is in progress so the
    /// device-side recognition UI can be activated
    async fn announce(&self, attempt: &LoginAttempt) -> Result<(), GatewayError>;

    /// Resolve a login token and recognition token to a user
    async fn confirm(
        &self,
        login_token: &str,
        recognition_token: &str,
    ) -> Result<Recognition, GatewayError>;
}

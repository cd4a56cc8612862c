//! Device login flow
//!
//! 1. The device calls [`start_session`]; the gateway mints a login token and
//!    announces the attempt (device and bound users) to the recognition service.
//! 2. Once the face is recognised, [`confirm_session`] trades the login token
//!    and recognition token for a session token and the user's dashboard.
//!
//! Confirming again for the same user issues a new token and invalidates the
//! previous one, so each user has at most one live session.

use crate::crypto::generate_login_token;
use crate::dashboard::{compose, Widget};
use crate::error::GatewayError;
use crate::provider::ProviderGateway;
use crate::recognition::{LoginAttempt, Recognition, RecognitionGateway};
use crate::state::AppState;
use crate::store::{DeviceId, SessionStore, SessionToken, UserStore};

/// Result of a successful confirmation
#[derive(Debug, Clone)]
pub struct ConfirmedSession {
    pub token: SessionToken,
    pub widgets: Vec<Widget>,
}

/// Begin a login attempt for a device and return its login token
pub async fn start_session<U, S, R, P>(
    state: &AppState<U, S, R, P>,
    device_id: DeviceId,
) -> Result<String, GatewayError>
where
    U: UserStore,
    S: SessionStore,
    R: RecognitionGateway,
    P: ProviderGateway,
{
    // Unknown devices still get a token; recognition is the real gate
    let candidates = state.user_store.users_for_device(device_id)?;

    let attempt = LoginAttempt {
        device_id,
        login_token: generate_login_token(),
        candidates,
    };
    state.recognition.announce(&attempt).await?;

    tracing::info!(
        device_id = device_id.0,
        candidates = attempt.candidates.len(),
        "Login attempt started"
    );

    Ok(attempt.login_token)
}

/// Exchange a recognised login attempt for a session token and dashboard
pub async fn confirm_session<U, S, R, P>(
    state: &AppState<U, S, R, P>,
    login_token: &str,
    recognition_token: &str,
) -> Result<ConfirmedSession, GatewayError>
where
    U: UserStore,
    S: SessionStore,
    R: RecognitionGateway,
    P: ProviderGateway,
{
    let user_id = match state
        .recognition
        .confirm(login_token, recognition_token)
        .await?
    {
        Recognition::Matched(user_id) => user_id,
        Recognition::NoMatch => {
            tracing::info!("Recognition did not match");
            return Err(GatewayError::invalid_token());
        }
    };

    let session = state.session_store.issue(user_id)?;
    tracing::info!(user_id = user_id.0, "Session issued");

    let widgets = compose(
        state.user_store.as_ref(),
        &state.timeline,
        &state.mail,
        user_id,
    )
    .await?;

    Ok(ConfirmedSession {
        token: session.token,
        widgets,
    })
}

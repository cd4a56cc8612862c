//! Session guard
//!
//! Every gated operation resolves its token to a user through [`validate`]
//! before running. Read-style routes take the token from the query string via
//! the [`SessionUser`] extractor; body-style routes call [`validate`] on the
//! token they parsed themselves.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;

use crate::error::GatewayError;
use crate::provider::ProviderGateway;
use crate::recognition::RecognitionGateway;
use crate::state::AppState;
use crate::store::{SessionStore, SessionToken, UserId, UserStore};

/// Outcome of a logout request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    LoggedOut(UserId),
    NotLoggedIn,
}

/// Resolve a token to the user owning it. Performs no mutation.
pub fn validate<S: SessionStore + ?Sized>(
    session_store: &S,
    token: Option<&str>,
) -> Result<UserId, GatewayError> {
    let token = token.ok_or_else(GatewayError::not_logged_in)?;

    session_store
        .get_by_token(&SessionToken(token.to_string()))?
        .map(|session| session.user_id)
        .ok_or_else(GatewayError::not_logged_in)
}

/// End the session holding this token. An unknown token is a normal outcome.
pub fn logout<S: SessionStore + ?Sized>(
    session_store: &S,
    token: &str,
) -> Result<LogoutOutcome, GatewayError> {
    let token = SessionToken(token.to_string());

    let Some(session) = session_store.get_by_token(&token)? else {
        return Ok(LogoutOutcome::NotLoggedIn);
    };

    if !session_store.delete(&token)? {
        // Rotated or logged out concurrently
        return Ok(LogoutOutcome::NotLoggedIn);
    }

    tracing::info!(user_id = session.user_id.0, "Session ended");
    Ok(LogoutOutcome::LoggedOut(session.user_id))
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// A user authenticated by the `token` query parameter
#[derive(Debug, Clone, Copy)]
pub struct SessionUser(pub UserId);

impl<U, S, R, P> FromRequestParts<Arc<AppState<U, S, R, P>>> for SessionUser
where
    U: UserStore + 'static,
    S: SessionStore + 'static,
    R: RecognitionGateway + 'static,
    P: ProviderGateway + 'static,
{
    type Rejection = GatewayError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<U, S, R, P>>,
    ) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<TokenQuery>::try_from_uri(&parts.uri)
            .map_err(|e| GatewayError::Validation(e.body_text()))?;

        let user_id = validate(state.session_store.as_ref(), query.token.as_deref())?;
        Ok(SessionUser(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemorySessionStore;

    #[test]
    fn test_validate_resolves_user() {
        let store = InMemorySessionStore::new();
        let session = store.issue(UserId(7)).unwrap();

        let user_id = validate(&store, Some(&session.token.0)).unwrap();
        assert_eq!(user_id, UserId(7));
    }

    #[test]
    fn test_validate_rejects_missing_and_unknown_tokens() {
        let store = InMemorySessionStore::new();

        let missing = validate(&store, None).unwrap_err();
        assert_eq!(missing.to_string(), "Unauthorized: Not logged in");

        let unknown = validate(&store, Some("nope")).unwrap_err();
        assert_eq!(unknown.to_string(), "Unauthorized: Not logged in");
    }

    #[test]
    fn test_logout_then_validate_fails() {
        let store = InMemorySessionStore::new();
        let session = store.issue(UserId(7)).unwrap();

        let outcome = logout(&store, &session.token.0).unwrap();
        assert_eq!(outcome, LogoutOutcome::LoggedOut(UserId(7)));

        assert!(validate(&store, Some(&session.token.0)).is_err());
    }

    #[test]
    fn test_logout_unknown_token() {
        let store = InMemorySessionStore::new();
        assert_eq!(logout(&store, "nope").unwrap(), LogoutOutcome::NotLoggedIn);
    }
}

//! HTTP routes for the gateway

mod login;
mod provider;
mod session;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::provider::ProviderGateway;
use crate::recognition::RecognitionGateway;
use crate::state::AppState;
use crate::store::{SessionStore, UserStore};

/// Create the router with all routes
pub fn create_router<U, S, R, P>(state: Arc<AppState<U, S, R, P>>) -> Router
where
    U: UserStore + 'static,
    S: SessionStore + 'static,
    R: RecognitionGateway + 'static,
    P: ProviderGateway + 'static,
{
    Router::new()
        .route("/login/start_session", post(login::start_session))
        .route("/login/confirm", post(login::confirm_session))
        .route("/logout", post(session::logout))
        .route("/test", post(session::test))
        .route("/facebook", get(provider::facebook))
        .route("/twitter", get(provider::twitter))
        .route("/tasks", get(provider::tasks))
        .route("/gmail", get(provider::gmail))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

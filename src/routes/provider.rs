//! Gated provider endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde_json::{json, Value};

use crate::error::GatewayError;
use crate::guard::SessionUser;
use crate::provider::ProviderGateway;
use crate::proxy::{self, Resource};
use crate::recognition::RecognitionGateway;
use crate::state::AppState;
use crate::store::{SessionStore, UserStore};

/// GET /facebook
///
/// There is no facebook collaborator yet; logged-in users get a fixed payload.
pub async fn facebook(SessionUser(_user_id): SessionUser) -> Json<Value> {
    Json(json!({ "data": "placeholder" }))
}

async fn forward<U, S, R, P>(
    state: &AppState<U, S, R, P>,
    resource: Resource,
    SessionUser(user_id): SessionUser,
) -> Result<Response, GatewayError>
where
    U: UserStore,
    S: SessionStore,
    R: RecognitionGateway,
    P: ProviderGateway,
{
    proxy::forward(state.provider(resource.provider()), resource, user_id).await
}

/// GET /twitter
pub async fn twitter<U, S, R, P>(
    State(state): State<Arc<AppState<U, S, R, P>>>,
    user: SessionUser,
) -> Result<Response, GatewayError>
where
    U: UserStore,
    S: SessionStore,
    R: RecognitionGateway,
    P: ProviderGateway,
{
    forward(&state, Resource::Timeline, user).await
}

/// GET /gmail
pub async fn gmail<U, S, R, P>(
    State(state): State<Arc<AppState<U, S, R, P>>>,
    user: SessionUser,
) -> Result<Response, GatewayError>
where
    U: UserStore,
    S: SessionStore,
    R: RecognitionGateway,
    P: ProviderGateway,
{
    forward(&state, Resource::Inbox, user).await
}

/// GET /tasks
pub async fn tasks<U, S, R, P>(
    State(state): State<Arc<AppState<U, S, R, P>>>,
    user: SessionUser,
) -> Result<Response, GatewayError>
where
    U: UserStore,
    S: SessionStore,
    R: RecognitionGateway,
    P: ProviderGateway,
{
    forward(&state, Resource::Tasks, user).await
}

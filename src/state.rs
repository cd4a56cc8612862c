//! Gateway application state

use std::sync::Arc;

use crate::provider::ProviderGateway;
use crate::recognition::RecognitionGateway;
use crate::store::{Provider, SessionStore, UserStore};

/// Shared state handed to every request handler
pub struct AppState<U, S, R, P> {
    /// Device bindings and dashboard layouts
    pub user_store: Arc<U>,
    pub session_store: Arc<S>,
    pub recognition: R,
    /// Social-timeline provider
    pub timeline: P,
    /// Mail and tasks provider
    pub mail: P,
}

impl<U, S, R, P> AppState<U, S, R, P>
where
    U: UserStore,
    S: SessionStore,
    R: RecognitionGateway,
    P: ProviderGateway,
{
    pub fn new(user_store: U, session_store: S, recognition: R, timeline: P, mail: P) -> Self {
        Self {
            user_store: Arc::new(user_store),
            session_store: Arc::new(session_store),
            recognition,
            timeline,
            mail,
        }
    }

    pub fn provider(&self, provider: Provider) -> &P {
        match provider {
            Provider::Timeline => &self.timeline,
            Provider::Mail => &self.mail,
        }
    }
}

//! Mirror Gateway
//!
//! Session gateway for smart-mirror devices. A device starts a login, the
//! face-recognition service confirms who is standing in front of it, and the
//! gateway issues a session token together with the user's dashboard. The
//! token then gates per-user data proxied from third-party providers.

pub mod config;
pub mod crypto;
pub mod dashboard;
pub mod error;
pub mod flow;
pub mod guard;
pub mod provider;
pub mod proxy;
pub mod recognition;
pub mod routes;
pub mod state;
pub mod store;

pub use config::{Config, ConfigError};
pub use error::GatewayError;
pub use provider::{HttpProviderGateway, ProviderGateway, ProviderResponse};
pub use recognition::{HttpRecognitionGateway, LoginAttempt, Recognition, RecognitionGateway};
pub use state::AppState;
pub use store::{
    BindingStore, ConfigStore, InMemorySessionStore, InMemoryUserStore, SessionStore, SqliteStore,
    UserStore,
};

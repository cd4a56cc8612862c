//! Storage abstractions for the gateway

pub mod memory;
pub mod models;
pub mod sqlite;

pub use memory::{InMemorySessionStore, InMemoryUserStore};
pub use models::*;
pub use sqlite::SqliteStore;

use crate::error::GatewayError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, GatewayError>;

/// Trait for device-to-user bindings
pub trait BindingStore: Send + Sync {
    /// Record that a device may log in on behalf of a user. Binding twice is a no-op.
    fn bind(&self, device_id: DeviceId, user_id: UserId) -> StoreResult<()>;

    /// List every user bound to a device, ascending
    fn users_for_device(&self, device_id: DeviceId) -> StoreResult<Vec<UserId>>;
}

/// Trait for per-user dashboard layouts
pub trait ConfigStore: Send + Sync {
    /// Insert or replace a user's layout
    fn put_config(&self, config: &UserConfig) -> StoreResult<()>;

    /// Get a user's layout
    fn get_config(&self, user_id: UserId) -> StoreResult<Option<UserConfig>>;
}

/// Bindings and layouts together make up the user-provisioned data
pub trait UserStore: BindingStore + ConfigStore {}

impl<T: BindingStore + ConfigStore> UserStore for T {}

/// Trait for session storage
pub trait SessionStore: Send + Sync {
    /// Issue a fresh token for a user, atomically replacing any previous one
    fn issue(&self, user_id: UserId) -> StoreResult<Session>;

    /// Get a session by its token
    fn get_by_token(&self, token: &SessionToken) -> StoreResult<Option<Session>>;

    /// Get the current session of a user
    fn get_for_user(&self, user_id: UserId) -> StoreResult<Option<Session>>;

    /// Delete a session. Returns false if no session had this token.
    fn delete(&self, token: &SessionToken) -> StoreResult<bool>;
}

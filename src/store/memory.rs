//! In-memory storage implementations

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::RwLock;

use chrono::Utc;

use super::{
    BindingStore, ConfigStore, DeviceId, DeviceUserBinding, Session, SessionStore, SessionToken,
    StoreResult, UserConfig, UserId,
};
use crate::crypto::generate_session_token;

/// In-memory binding and layout store
pub struct InMemoryUserStore {
    bindings: RwLock<HashSet<DeviceUserBinding>>,
    configs: RwLock<HashMap<UserId, UserConfig>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            bindings: RwLock::new(HashSet::new()),
            configs: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingStore for InMemoryUserStore {
    fn bind(&self, device_id: DeviceId, user_id: UserId) -> StoreResult<()> {
        self.bindings
            .write()
            .unwrap()
            .insert(DeviceUserBinding { device_id, user_id });
        Ok(())
    }

    fn users_for_device(&self, device_id: DeviceId) -> StoreResult<Vec<UserId>> {
        let bindings = self.bindings.read().unwrap();
        let users: BTreeSet<UserId> = bindings
            .iter()
            .filter(|b| b.device_id == device_id)
            .map(|b| b.user_id)
            .collect();
        Ok(users.into_iter().collect())
    }
}

impl ConfigStore for InMemoryUserStore {
    fn put_config(&self, config: &UserConfig) -> StoreResult<()> {
        self.configs
            .write()
            .unwrap()
            .insert(config.user_id, config.clone());
        Ok(())
    }

    fn get_config(&self, user_id: UserId) -> StoreResult<Option<UserConfig>> {
        Ok(self.configs.read().unwrap().get(&user_id).cloned())
    }
}

/// Both indices live under one lock so a rotation is never half-visible
#[derive(Default)]
struct SessionTables {
    by_user: HashMap<UserId, Session>,
    by_token: HashMap<SessionToken, UserId>,
}

/// In-memory session store
pub struct InMemorySessionStore {
    tables: RwLock<SessionTables>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(SessionTables::default()),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemorySessionStore {
    fn issue(&self, user_id: UserId) -> StoreResult<Session> {
        let session = Session {
            user_id,
            token: SessionToken(generate_session_token()),
            created_at: Utc::now(),
        };

        let mut tables = self.tables.write().unwrap();
        if let Some(previous) = tables.by_user.insert(user_id, session.clone()) {
            tables.by_token.remove(&previous.token);
        }
        tables.by_token.insert(session.token.clone(), user_id);

        Ok(session)
    }

    fn get_by_token(&self, token: &SessionToken) -> StoreResult<Option<Session>> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .by_token
            .get(token)
            .and_then(|user_id| tables.by_user.get(user_id))
            .cloned())
    }

    fn get_for_user(&self, user_id: UserId) -> StoreResult<Option<Session>> {
        Ok(self.tables.read().unwrap().by_user.get(&user_id).cloned())
    }

    fn delete(&self, token: &SessionToken) -> StoreResult<bool> {
        let mut tables = self.tables.write().unwrap();
        match tables.by_token.remove(token) {
            Some(user_id) => {
                tables.by_user.remove(&user_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Placement;

    #[test]
    fn test_bindings_are_many_to_many() {
        let store = InMemoryUserStore::new();

        store.bind(DeviceId(42), UserId(7)).unwrap();
        store.bind(DeviceId(42), UserId(3)).unwrap();
        store.bind(DeviceId(42), UserId(7)).unwrap();
        store.bind(DeviceId(9), UserId(7)).unwrap();

        assert_eq!(
            store.users_for_device(DeviceId(42)).unwrap(),
            vec![UserId(3), UserId(7)]
        );
        assert_eq!(store.users_for_device(DeviceId(9)).unwrap(), vec![UserId(7)]);
        assert!(store.users_for_device(DeviceId(1)).unwrap().is_empty());
    }

    #[test]
    fn test_config_roundtrip() {
        let store = InMemoryUserStore::new();
        assert!(store.get_config(UserId(7)).unwrap().is_none());

        let mut config = UserConfig::empty(UserId(7));
        config.twitter = Placement::new(1, 2, 100, 50);
        store.put_config(&config).unwrap();

        assert_eq!(store.get_config(UserId(7)).unwrap(), Some(config));
    }

    #[test]
    fn test_session_lifecycle() {
        let store = InMemorySessionStore::new();

        let session = store.issue(UserId(1)).unwrap();
        let found = store.get_by_token(&session.token).unwrap().unwrap();
        assert_eq!(found.user_id, UserId(1));

        assert!(store.delete(&session.token).unwrap());
        assert!(store.get_by_token(&session.token).unwrap().is_none());
        assert!(store.get_for_user(UserId(1)).unwrap().is_none());
        assert!(!store.delete(&session.token).unwrap());
    }

    #[test]
    fn test_issue_replaces_previous_token() {
        let store = InMemorySessionStore::new();

        let first = store.issue(UserId(1)).unwrap();
        let second = store.issue(UserId(1)).unwrap();

        assert_ne!(first.token, second.token);
        assert!(store.get_by_token(&first.token).unwrap().is_none());
        assert_eq!(
            store.get_for_user(UserId(1)).unwrap().unwrap().token,
            second.token
        );
    }

    #[test]
    fn test_sessions_of_different_users_are_independent() {
        let store = InMemorySessionStore::new();

        let a = store.issue(UserId(1)).unwrap();
        let b = store.issue(UserId(2)).unwrap();
        store.delete(&a.token).unwrap();

        assert!(store.get_by_token(&b.token).unwrap().is_some());
    }

    #[test]
    fn test_concurrent_issue_leaves_one_live_token() {
        let store = InMemorySessionStore::new();

        let tokens: Vec<SessionToken> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| scope.spawn(|| store.issue(UserId(7)).unwrap().token))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let live = tokens
            .iter()
            .filter(|token| store.get_by_token(token).unwrap().is_some())
            .count();
        assert_eq!(live, 1);
    }
}

use std::rc::Rc;

use log::{debug, error};

use crate::config::ClientConfig;
use crate::storage::KeyValueStore;
use crate::view::SessionBanner;

/// Owns the persisted credential pair. It never pushes updates: after a
/// transition the caller recomputes whatever depends on [`SessionManager::banner`]
/// or [`SessionManager::current_user`].
pub struct SessionManager<S> {
    store: Rc<S>,
    token_key: String,
    username_key: String,
}

impl<S: KeyValueStore> SessionManager<S> {
    pub fn new(store: Rc<S>, config: &ClientConfig) -> Self {
        SessionManager {
            store,
            token_key: config.token_key.clone(),
            username_key: config.username_key.clone(),
        }
    }

    /// Stores both values. If the username cannot be written the token is
    /// removed again, so a half-written session is never observed.
    pub fn login(&self, token: &str, username: &str) {
        debug!("login as {}", username);

        if let Err(err) = self.store.set(&self.token_key, token) {
            error!("could not persist token: {}", err);
            return;
        }
        if let Err(err) = self.store.set(&self.username_key, username) {
            error!("could not persist username: {}", err);
            self.clear(&self.token_key);
        }
    }

    pub fn logout(&self) {
        debug!("logout");
        self.clear(&self.token_key);
        self.clear(&self.username_key);
    }

    pub fn token(&self) -> Option<String> {
        self.store
            .get(&self.token_key)
            .filter(|token| !token.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// The stored username, only while a token is held.
    pub fn current_user(&self) -> Option<String> {
        self.token()?;
        self.store
            .get(&self.username_key)
            .filter(|username| !username.is_empty())
    }

    pub fn banner(&self) -> SessionBanner {
        SessionBanner::new(self.is_authenticated(), self.current_user().as_deref())
    }

    fn clear(&self, key: &str) {
        if let Err(err) = self.store.remove(key) {
            error!("could not clear {}: {}", key, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::storage::MemoryStore;

    fn manager(store: &MemoryStore) -> SessionManager<MemoryStore> {
        SessionManager::new(Rc::new(store.clone()), &ClientConfig::default())
    }

    #[test]
    fn login_then_logout() {
        let store = MemoryStore::new();
        let session = manager(&store);
        assert!(!session.is_authenticated());
        assert_eq!(session.current_user(), None);

        session.login("T", "ada");
        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some("T"));
        assert_eq!(session.current_user().as_deref(), Some("ada"));

        session.logout();
        assert!(!session.is_authenticated());
        assert_eq!(session.current_user(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn username_without_token_is_ignored() {
        let store = MemoryStore::with_items([("username", "ghost")]);
        let session = manager(&store);
        assert_eq!(session.current_user(), None);
    }

    /// Refuses to write one key.
    struct FailingStore {
        inner: MemoryStore,
        broken_key: &'static str,
    }

    impl KeyValueStore for FailingStore {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> crate::Result<()> {
            if key == self.broken_key {
                return Err(ClientError::Storage("quota exceeded".into()));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> crate::Result<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn failed_username_write_rolls_back_token() {
        let inner = MemoryStore::new();
        let store = FailingStore {
            inner: inner.clone(),
            broken_key: "username",
        };
        let session = SessionManager::new(Rc::new(store), &ClientConfig::default());

        session.login("T", "ada");

        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
        assert_eq!(session.current_user(), None);
        assert!(inner.is_empty());
    }

    #[test]
    fn survives_reload() {
        let store = MemoryStore::new();
        manager(&store).login("T", "ada");

        let reloaded = manager(&store);
        assert_eq!(reloaded.current_user().as_deref(), Some("ada"));
        assert_eq!(reloaded.banner().auth_label, "Logout");
    }
}

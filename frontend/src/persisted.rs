use blog_sync::{ClientError, KeyValueStore};
use web_sys::Storage;

use crate::describe_js;

/// `localStorage`-backed persistence for the session and the base url override.
pub struct LocalStore {
    storage: Storage,
}

impl LocalStore {
    pub fn new(storage: Storage) -> Self {
        LocalStore { storage }
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> blog_sync::Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|err| ClientError::Storage(describe_js(&err)))
    }

    fn remove(&self, key: &str) -> blog_sync::Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|err| ClientError::Storage(describe_js(&err)))
    }
}

use std::rc::Rc;

use log::{error, info};

use crate::config::ClientConfig;
use crate::storage::KeyValueStore;

/// Picks the API base URL: a persisted user override wins, otherwise the
/// default for the page's hostname.
pub struct EndpointResolver<S> {
    store: Rc<S>,
    key: String,
    local_default: String,
    production_default: String,
    loopback_hosts: Vec<String>,
}

impl<S: KeyValueStore> EndpointResolver<S> {
    pub fn new(store: Rc<S>, config: &ClientConfig) -> Self {
        EndpointResolver {
            store,
            key: config.base_url_key.clone(),
            local_default: config.local_base_url.clone(),
            production_default: config.production_base_url.clone(),
            loopback_hosts: config.loopback_hosts.clone(),
        }
    }

    pub fn default_for(&self, hostname: &str) -> &str {
        if self.loopback_hosts.iter().any(|host| host == hostname) {
            &self.local_default
        } else {
            &self.production_default
        }
    }

    pub fn resolve(&self, hostname: &str) -> String {
        let base = self
            .store
            .get(&self.key)
            .filter(|stored| !stored.is_empty())
            .unwrap_or_else(|| self.default_for(hostname).to_owned());

        strip_trailing_slashes(&base).to_owned()
    }

    /// Persists `url` (trimmed, otherwise unvalidated). The caller is expected
    /// to refresh the post list afterwards.
    pub fn set_override(&self, url: &str) {
        let url = url.trim();
        info!("api base url set to {:?}", url);

        if let Err(err) = self.store.set(&self.key, url) {
            error!("could not persist api base url: {}", err);
        }
    }
}

pub fn strip_trailing_slashes(url: &str) -> &str {
    url.trim_end_matches('/')
}

/// Everything before the first `/api/` segment; auth endpoints hang off it.
pub fn origin(base: &str) -> &str {
    match base.find("/api/") {
        Some(index) => &base[..index],
        None => base,
    }
}

use log::warn;
use serde::{Deserialize, Serialize};

use crate::catalog::CategorySource;

pub const LOCAL_BASE_URL: &'static str = "http://localhost:5021/api/v1";
pub const PRODUCTION_BASE_URL: &'static str = "https://your-production-backend-url.com/api/v1";

pub const BASE_URL_STORAGE_KEY: &'static str = "apiBaseUrl";
pub const TOKEN_STORAGE_KEY: &'static str = "authToken";
pub const USERNAME_STORAGE_KEY: &'static str = "username";

/// Deployment knobs. Every field has a default so a page can pass a partial
/// JSON object (or nothing at all).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub local_base_url: String,
    pub production_base_url: String,
    /// Hostnames that resolve to `local_base_url`.
    pub loopback_hosts: Vec<String>,
    pub category_source: CategorySource,
    pub base_url_key: String,
    pub token_key: String,
    pub username_key: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            local_base_url: LOCAL_BASE_URL.into(),
            production_base_url: PRODUCTION_BASE_URL.into(),
            loopback_hosts: vec!["localhost".into()],
            category_source: CategorySource::default(),
            base_url_key: BASE_URL_STORAGE_KEY.into(),
            token_key: TOKEN_STORAGE_KEY.into(),
            username_key: USERNAME_STORAGE_KEY.into(),
        }
    }
}

impl ClientConfig {
    /// Reads an optional JSON override; anything unparsable falls back to the defaults.
    pub fn load(json: Option<&str>) -> Self {
        match json.map(str::trim).filter(|raw| !raw.is_empty()) {
            None => ClientConfig::default(),
            Some(raw) => serde_json::from_str(raw).unwrap_or_else(|err| {
                warn!("invalid client config, using defaults: {}", err);
                ClientConfig::default()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = ClientConfig::load(Some(r#"{"production_base_url": "https://blog.example/api/v1"}"#));

        assert_eq!(config.production_base_url, "https://blog.example/api/v1");
        assert_eq!(config.local_base_url, LOCAL_BASE_URL);
        assert_eq!(config.token_key, TOKEN_STORAGE_KEY);
    }

    #[test]
    fn garbage_falls_back() {
        assert_eq!(ClientConfig::load(Some("{nope")), ClientConfig::default());
        assert_eq!(ClientConfig::load(Some("  ")), ClientConfig::default());
        assert_eq!(ClientConfig::load(None), ClientConfig::default());
    }

    #[test]
    fn category_source_by_name() {
        let config = ClientConfig::load(Some(r#"{"category_source": "origin_api"}"#));
        assert_eq!(config.category_source, CategorySource::OriginApi);
    }
}

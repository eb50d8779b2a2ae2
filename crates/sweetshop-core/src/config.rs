//! Application configuration management.
//!
//! This module handles loading and saving the client configuration: the
//! service address, request timeout, where the token is kept, and the last
//! email used to sign in.
//!
//! Configuration is stored at `~/.config/sweetshop/config.json`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, DEFAULT_BASE_URL, REQUEST_TIMEOUT_SECS};
use crate::auth::{FileTokenStore, KeyringTokenStore, SessionStore, SharedTokenStore};

/// Application name used for config/cache directory paths
pub const APP_NAME: &str = "sweetshop";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Where the bearer token is persisted between runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStorage {
    /// `session.json` in the cache directory
    #[default]
    File,
    /// OS keychain
    Keyring,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub base_url: Option<String>,
    pub last_email: Option<String>,
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub token_storage: TokenStorage,
    /// Route answering with the signed-in user. When set, restored tokens
    /// are checked against it on startup.
    pub verify_path: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(REQUEST_TIMEOUT_SECS))
    }

    pub fn token_store(&self) -> Result<SharedTokenStore> {
        let store: SharedTokenStore = match self.token_storage {
            TokenStorage::File => Arc::new(FileTokenStore::in_cache_dir(APP_NAME)?),
            TokenStorage::Keyring => Arc::new(KeyringTokenStore::new()),
        };
        Ok(store)
    }

    pub fn api_client(&self, tokens: SharedTokenStore) -> Result<ApiClient> {
        ApiClient::with_timeout(self.base_url(), tokens, self.request_timeout())
            .context("Failed to build HTTP client")
    }

    /// Session store wired to this configuration's client and token backend
    pub fn session_store(&self) -> Result<SessionStore> {
        self.session_store_with(self.token_store()?)
    }

    /// Session store over an explicit token backend
    pub fn session_store_with(&self, tokens: SharedTokenStore) -> Result<SessionStore> {
        let api = self.api_client(tokens)?;
        let store = SessionStore::new(api);
        Ok(match self.verify_path {
            Some(ref path) => store.with_verify_path(path.clone()),
            None => store,
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};

    use super::*;
    use crate::auth::{MemoryTokenStore, SessionState};
    use crate::testing::{user_json, MockServer};

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().expect("failed to create tmpdir");
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(REQUEST_TIMEOUT_SECS));
        assert_eq!(config.token_storage, TokenStorage::File);
        assert!(config.verify_path.is_none());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().expect("failed to create tmpdir");
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            base_url: Some("https://shop.example/api".to_string()),
            last_email: Some("a@b.com".to_string()),
            request_timeout_secs: Some(5),
            token_storage: TokenStorage::Keyring,
            verify_path: Some("/auth/me".to_string()),
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.base_url(), "https://shop.example/api");
        assert_eq!(loaded.last_email.as_deref(), Some("a@b.com"));
        assert_eq!(loaded.request_timeout(), Duration::from_secs(5));
        assert_eq!(loaded.token_storage, TokenStorage::Keyring);
    }

    #[test]
    fn test_partial_config_file() {
        let dir = tempfile::tempdir().expect("failed to create tmpdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"token_storage": "keyring"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.token_storage, TokenStorage::Keyring);
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().expect("failed to create tmpdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_api_client_uses_configured_base_url() {
        let config = Config {
            base_url: Some("http://127.0.0.1:9/api/".to_string()),
            ..Default::default()
        };
        let client = config.api_client(Arc::new(MemoryTokenStore::new())).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9/api");
    }

    #[test]
    fn test_token_storage_selects_backend() {
        let config = Config {
            token_storage: TokenStorage::Keyring,
            ..Default::default()
        };
        assert_eq!(config.token_store().unwrap().kind(), "keyring");

        // The file backend only needs a cache directory to exist
        if dirs::cache_dir().is_some() {
            assert_eq!(Config::default().token_store().unwrap().kind(), "file");
        }
    }

    #[tokio::test]
    async fn test_session_store_uses_configured_verify_path() {
        let server = MockServer::start().await;
        server.respond(Method::GET, "/auth/me", StatusCode::OK, user_json(3, "a@b.com"));
        let config = Config {
            base_url: Some(server.base_url().to_string()),
            verify_path: Some("/auth/me".to_string()),
            ..Default::default()
        };

        let mut session = config
            .session_store_with(Arc::new(MemoryTokenStore::with_token("abc123")))
            .unwrap();
        assert_eq!(session.initialize().await.unwrap(), SessionState::Authenticated);
        assert_eq!(session.user().map(|u| u.id), Some(3));

        let req = server.last_request();
        assert_eq!(req.path, "/api/auth/me");
        assert_eq!(req.authorization.as_deref(), Some("Bearer abc123"));
    }

    #[tokio::test]
    async fn test_session_store_without_verify_path_trusts_token() {
        let server = MockServer::start().await;
        let config = Config {
            base_url: Some(server.base_url().to_string()),
            ..Default::default()
        };

        let mut session = config
            .session_store_with(Arc::new(MemoryTokenStore::with_token("abc123")))
            .unwrap();
        assert_eq!(session.initialize().await.unwrap(), SessionState::Authenticated);
        assert_eq!(server.request_count(), 0);
    }
}

//! Durable storage for the bearer token.
//!
//! `TokenStore` is the one piece of state shared between `SessionStore`
//! (which writes it on login/logout) and `ApiClient` (which reads it before
//! every request). Backends:
//!
//! - `FileTokenStore`: `session.json` in the cache directory
//! - `KeyringTokenStore`: the OS keychain (see `credentials`)
//! - `MemoryTokenStore`: process-local, for tests and embedding

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Token storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("Token file is corrupt: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Keychain error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("Could not find a cache directory for the token file")]
    NoCacheDir,

    #[error("Token storage lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistent home of the bearer token.
///
/// Implementations must be cheap enough to call once per outgoing request.
pub trait TokenStore: Send + Sync {
    /// Read the persisted token, `None` when nothing is stored
    fn load(&self) -> StoreResult<Option<String>>;

    /// Replace the persisted token
    fn save(&self, token: &str) -> StoreResult<()>;

    /// Remove the persisted token. Clearing an empty store succeeds.
    fn clear(&self) -> StoreResult<()>;

    /// Short backend name for logs and status output
    fn kind(&self) -> &'static str;

    /// When the current token was stored, if the backend records it
    fn saved_at(&self) -> StoreResult<Option<DateTime<Utc>>> {
        Ok(None)
    }
}

pub type SharedTokenStore = Arc<dyn TokenStore>;

// ============================================================================
// Memory
// ============================================================================

#[derive(Default)]
pub struct MemoryTokenStore {
    record: RwLock<Option<TokenRecord>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            record: RwLock::new(Some(TokenRecord::new(token))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> StoreResult<Option<String>> {
        let guard = self.record.read().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.as_ref().map(|r| r.token.clone()))
    }

    fn save(&self, token: &str) -> StoreResult<()> {
        let mut guard = self.record.write().map_err(|_| StoreError::Poisoned)?;
        *guard = Some(TokenRecord::new(token));
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        let mut guard = self.record.write().map_err(|_| StoreError::Poisoned)?;
        *guard = None;
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "memory"
    }

    fn saved_at(&self) -> StoreResult<Option<DateTime<Utc>>> {
        let guard = self.record.read().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.as_ref().map(|r| r.saved_at))
    }
}

// ============================================================================
// File
// ============================================================================

/// On-disk form of the token. `saved_at` is informational; tokens are never
/// expired locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRecord {
    pub token: String,
    pub saved_at: DateTime<Utc>,
}

impl TokenRecord {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            saved_at: Utc::now(),
        }
    }
}

pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store the token as `session.json` inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(SESSION_FILE))
    }

    /// Store the token in the per-user cache directory for `app_name`
    pub fn in_cache_dir(app_name: &str) -> StoreResult<Self> {
        let cache_dir = dirs::cache_dir().ok_or(StoreError::NoCacheDir)?;
        Ok(Self::in_dir(cache_dir.join(app_name)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full record, including when it was saved
    pub fn record(&self) -> StoreResult<Option<TokenRecord>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[cfg(unix)]
    fn write_private(&self, contents: &str) -> io::Result<()> {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(&self.path)?;
        file.write_all(contents.as_bytes())
    }

    #[cfg(not(unix))]
    fn write_private(&self, contents: &str) -> io::Result<()> {
        fs::write(&self.path, contents)
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> StoreResult<Option<String>> {
        Ok(self.record()?.map(|r| r.token))
    }

    fn save(&self, token: &str) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&TokenRecord::new(token))?;
        self.write_private(&contents)?;
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn kind(&self) -> &'static str {
        "file"
    }

    fn saved_at(&self) -> StoreResult<Option<DateTime<Utc>>> {
        Ok(self.record()?.map(|r| r.saved_at))
    }
}

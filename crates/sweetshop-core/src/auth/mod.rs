//! Authentication module for managing the client session and its token.
//!
//! This module provides:
//! - `SessionStore`: login/register/logout and session restore on startup
//! - `TokenStore`: durable token storage shared with the `ApiClient`
//!   (file, OS keychain or memory backends)
//!
//! The token survives restarts and is removed on logout.

pub mod credentials;
pub mod error;
pub mod session;
pub mod storage;

pub use credentials::KeyringTokenStore;
pub use error::AuthError;
pub use session::{Session, SessionState, SessionStore};
pub use storage::{
    FileTokenStore, MemoryTokenStore, SharedTokenStore, StoreError, StoreResult, TokenRecord,
    TokenStore,
};

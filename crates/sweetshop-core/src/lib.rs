//! Core library for the sweet shop client.
//!
//! - `api`: `ApiClient`, the HTTP gateway, and its route groups
//! - `auth`: `SessionStore` and bearer-token storage
//! - `models`: data-transfer shapes (`User`, `Sweet`, `Purchase`, ...)
//! - `config`: on-disk client configuration
//!
//! ```no_run
//! # async fn demo() -> anyhow::Result<()> {
//! use sweetshop_core::Config;
//!
//! let mut session = Config::load()?.session_store()?;
//! session.initialize().await?;
//! if !session.is_authenticated() {
//!     session.login("a@b.com", "secret").await?;
//! }
//! let sweets = session.api().sweets().list().await?;
//! # let _ = sweets;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

#[cfg(test)]
mod testing;

pub use api::{ApiClient, ApiError};
pub use auth::{
    AuthError, FileTokenStore, KeyringTokenStore, MemoryTokenStore, Session, SessionState,
    SessionStore, SharedTokenStore, TokenStore,
};
pub use config::{Config, TokenStorage, APP_NAME};

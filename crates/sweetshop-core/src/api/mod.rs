//! REST API client module for the sweet shop service.
//!
//! `ApiClient` is the single gateway to the remote service. Its routes are
//! grouped the way the service groups them:
//!
//! - `auth()`: login and registration
//! - `sweets()`: catalog reads, admin writes, purchase and restock
//! - `purchases()`: the caller's purchase history
//!
//! Every request carries `Authorization: Bearer <token>` when a token is
//! stored.

pub mod auth;
pub mod client;
pub mod error;
pub mod purchases;
pub mod sweets;

pub use auth::AuthApi;
pub use client::{ApiClient, ApiResult, DEFAULT_BASE_URL, REQUEST_TIMEOUT_SECS};
pub use error::ApiError;
pub use purchases::PurchasesApi;
pub use sweets::SweetsApi;

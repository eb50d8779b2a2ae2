//! Data models for the sweet shop service.
//!
//! These are plain data-transfer shapes exchanged with the remote API:
//!
//! - `User`: an account as returned by registration
//! - `Sweet`, `NewSweet`, `SweetUpdate`, `SweetSearch`: the catalog
//! - `Purchase`: one entry of the caller's purchase history
//! - Auth payloads: `RegisterRequest`, `TokenResponse`
//!
//! With the `ts` feature enabled every shape also derives `ts_rs::TS`, so
//! the frontend's TypeScript declarations can be generated from here.

pub mod auth;
pub mod purchase;
pub mod sweet;
pub mod user;

pub use auth::{Credentials, RegisterRequest, TokenResponse};
pub use purchase::{Purchase, QuantityRequest};
pub use sweet::{DeleteResponse, NewSweet, Pagination, Sweet, SweetSearch, SweetUpdate};
pub use user::User;

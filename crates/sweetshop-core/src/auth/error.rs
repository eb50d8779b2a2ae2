use thiserror::Error;

use crate::api::ApiError;

use super::storage::StoreError;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Login or registration failed. Bad credentials and transport failures
    /// both land here.
    #[error("Authentication failed: {0}")]
    Authentication(#[source] ApiError),

    /// The restored session could not be checked for a reason other than
    /// the server rejecting the token
    #[error("Could not verify session: {0}")]
    Transport(#[source] ApiError),

    #[error("Failed to persist session token: {0}")]
    Storage(#[from] StoreError),
}

impl AuthError {
    /// The underlying API error, if the failure came from the remote service
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            AuthError::Authentication(e) | AuthError::Transport(e) => Some(e),
            AuthError::Storage(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_unauthorized)
    }
}

//! Authentication routes: `/auth/login`, `/auth/register`.

use crate::models::{Credentials, RegisterRequest, TokenResponse, User};

use super::client::{ApiClient, ApiResult};

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }
}

impl AuthApi<'_> {
    /// Exchange credentials for a bearer token.
    ///
    /// The body is form-encoded and the identifier travels as `username`,
    /// which is what the remote OAuth2-style login route expects.
    pub async fn login(&self, identifier: &str, secret: &str) -> ApiResult<TokenResponse> {
        let credentials = Credentials { identifier, secret };
        self.client.post_form("/auth/login", &credentials).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<User> {
        self.client.post("/auth/register", request).await
    }

    /// Fetch the profile of the user the current token belongs to.
    ///
    /// The service has no standard route for this, so the path is supplied
    /// by configuration.
    pub async fn me(&self, path: &str) -> ApiResult<User> {
        self.client.get(path).await
    }
}

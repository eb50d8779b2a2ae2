//! API client for communicating with the sweet shop REST API.
//!
//! `ApiClient` owns one configured `reqwest::Client` bound to a base
//! address. It has no authorization state of its own: the bearer token is
//! read from the shared `TokenStore` each time a request is built, so a
//! login or logout is picked up by the very next request.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::auth::SharedTokenStore;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL of a locally running shop backend
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// HTTP request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// API client for the sweet shop service.
/// Clone is cheap - reqwest::Client and the token store are both behind Arc.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: SharedTokenStore,
    /// Token signed out of but still in storage; never attached again
    revoked: Arc<Mutex<Option<String>>>,
}

impl ApiClient {
    /// Create a client with the default request timeout
    pub fn new(base_url: impl Into<String>, tokens: SharedTokenStore) -> ApiResult<Self> {
        Self::with_timeout(base_url, tokens, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        tokens: SharedTokenStore,
        timeout: Duration,
    ) -> ApiResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            tokens,
            revoked: Arc::new(Mutex::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The store this client reads its bearer token from
    pub fn token_store(&self) -> &SharedTokenStore {
        &self.tokens
    }

    /// Stop attaching `token` even though the store may still return it.
    /// Used when a logout could not remove it from storage.
    pub(crate) fn revoke(&self, token: String) {
        *self.revoked.lock().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub(crate) fn clear_revoked(&self) {
        *self.revoked.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Token to attach to the next request. A storage failure is not fatal:
    /// the request goes out unauthenticated and the server decides.
    fn current_token(&self) -> Option<String> {
        let token = match self.tokens.load() {
            Ok(token) => token?,
            Err(e) => {
                warn!(error = %e, store = self.tokens.kind(), "Failed to read token, sending request unauthenticated");
                return None;
            }
        };

        let revoked = self.revoked.lock().unwrap_or_else(PoisonError::into_inner);
        if revoked.as_deref() == Some(token.as_str()) {
            debug!("Stored token was signed out of, sending request unauthenticated");
            return None;
        }
        Some(token)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        let token = self.current_token();
        debug!(%method, url = %url, authenticated = token.is_some(), "Sending request");

        let builder = self.client.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> ApiResult<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            debug!(%status, "Request failed");
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> ApiResult<T> {
        let response = builder.send().await?;
        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        Self::send(self.request(Method::GET, path)).await
    }

    pub(crate) async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> ApiResult<T> {
        Self::send(self.request(Method::GET, path).query(query)).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        Self::send(self.request(Method::POST, path).json(body)).await
    }

    /// POST an `application/x-www-form-urlencoded` body
    pub(crate) async fn post_form<T: DeserializeOwned, F: Serialize + ?Sized>(
        &self,
        path: &str,
        form: &F,
    ) -> ApiResult<T> {
        Self::send(self.request(Method::POST, path).form(form)).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        Self::send(self.request(Method::PUT, path).json(body)).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        Self::send(self.request(Method::DELETE, path)).await
    }
}

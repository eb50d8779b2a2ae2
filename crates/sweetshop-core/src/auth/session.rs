//! Client-side session lifecycle.
//!
//! `SessionStore` is the single source of truth for "is the caller signed
//! in" on the client. It writes the bearer token to the same `TokenStore`
//! the `ApiClient` reads before each request, which is the only coupling
//! between the two.
//!
//! ```text
//! initialize, no token       -> Anonymous
//! initialize, token restored -> LoadingSession
//! LoadingSession             -> Authenticated         (trusted or verified)
//!                            -> Anonymous             (server says unauthorized)
//!                            -> AuthenticationFailed  (any other error)
//! login succeeds             -> Authenticated
//! logout                     -> Anonymous
//! ```

use std::fmt;

use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::models::{RegisterRequest, User};

use super::error::AuthError;
use super::storage::SharedTokenStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No token
    Anonymous,
    /// A persisted token was found and is being checked
    LoadingSession,
    Authenticated,
    /// A token exists but could not be verified for a reason other than the
    /// server rejecting it. `refresh_user` retries.
    AuthenticationFailed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Anonymous => write!(f, "anonymous"),
            SessionState::LoadingSession => write!(f, "loading"),
            SessionState::Authenticated => write!(f, "authenticated"),
            SessionState::AuthenticationFailed => write!(f, "unverified"),
        }
    }
}

/// Snapshot of the client's authentication status.
///
/// `user` is only populated once a verification round trip has succeeded;
/// a token on its own says nothing about it.
#[derive(Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
    pub is_loading: bool,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user)
            .field("is_loading", &self.is_loading)
            .finish()
    }
}

pub struct SessionStore {
    api: ApiClient,
    session: Session,
    state: SessionState,
    verify_path: Option<String>,
}

impl SessionStore {
    /// Create a store that persists through the client's token store.
    /// Nothing is read until `initialize`.
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            session: Session {
                is_loading: true,
                ..Session::default()
            },
            state: SessionState::Anonymous,
            verify_path: None,
        }
    }

    /// Confirm restored tokens with a GET to `path`, which must answer with
    /// the signed-in `User`. Without this a restored token is trusted as-is.
    pub fn with_verify_path(mut self, path: impl Into<String>) -> Self {
        self.verify_path = Some(path.into());
        self
    }

    fn tokens(&self) -> &SharedTokenStore {
        self.api.token_store()
    }

    /// Read the persisted token into memory and settle the initial state.
    pub async fn initialize(&mut self) -> Result<SessionState, AuthError> {
        let persisted = match self.tokens().load() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, store = self.tokens().kind(), "Failed to read persisted token, starting anonymous");
                None
            }
        };

        match persisted {
            None => {
                debug!("No persisted session token");
                self.session = Session::default();
                self.state = SessionState::Anonymous;
            }
            Some(token) => {
                debug!(store = self.tokens().kind(), "Restored persisted session token");
                self.session = Session {
                    token: Some(token),
                    user: None,
                    is_loading: true,
                };
                self.state = SessionState::LoadingSession;
                self.fetch_current_user().await?;
            }
        }

        Ok(self.state)
    }

    /// Settle a `LoadingSession`.
    ///
    /// Without a verify path the token is accepted without contacting the
    /// server. With one, only an unauthorized answer signs the user out;
    /// other failures keep the token and are returned.
    async fn fetch_current_user(&mut self) -> Result<(), AuthError> {
        let Some(path) = self.verify_path.clone() else {
            debug!("No verify path configured, trusting restored token");
            self.session.is_loading = false;
            self.state = SessionState::Authenticated;
            return Ok(());
        };

        let result = self.api.auth().me(&path).await;
        self.session.is_loading = false;

        match result {
            Ok(user) => {
                debug!(user_id = user.id, "Session verified");
                self.session.user = Some(user);
                self.state = SessionState::Authenticated;
                Ok(())
            }
            Err(e) if e.is_unauthorized() => {
                info!("Restored token was rejected, signing out");
                self.logout();
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Could not verify restored session");
                self.state = SessionState::AuthenticationFailed;
                Err(AuthError::Transport(e))
            }
        }
    }

    /// Re-run verification for the current token
    pub async fn refresh_user(&mut self) -> Result<SessionState, AuthError> {
        if self.session.token.is_none() {
            self.session.is_loading = false;
            self.state = SessionState::Anonymous;
            return Ok(self.state);
        }

        self.session.is_loading = true;
        self.state = SessionState::LoadingSession;
        self.fetch_current_user().await?;
        Ok(self.state)
    }

    /// Sign in. On any failure the previous session, persisted token
    /// included, is left exactly as it was.
    pub async fn login(&mut self, identifier: &str, secret: &str) -> Result<(), AuthError> {
        let response = match self.api.auth().login(identifier, secret).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Login failed");
                return Err(AuthError::Authentication(e));
            }
        };

        // Persist first so a storage failure leaves memory untouched
        if let Err(e) = self.tokens().save(&response.access_token) {
            warn!(error = %e, store = self.tokens().kind(), "Failed to persist session token");
            return Err(e.into());
        }

        self.api.clear_revoked();
        self.session = Session {
            token: Some(response.access_token),
            user: None,
            is_loading: false,
        };
        self.state = SessionState::Authenticated;
        info!("Login successful");
        Ok(())
    }

    /// Create an account, then sign in with the same credentials.
    /// Registration alone does not establish a session.
    pub async fn register(
        &mut self,
        email: &str,
        secret: &str,
        display_name: &str,
    ) -> Result<(), AuthError> {
        let request = RegisterRequest {
            email: email.to_string(),
            password: secret.to_string(),
            full_name: display_name.to_string(),
        };

        match self.api.auth().register(&request).await {
            Ok(user) => debug!(user_id = user.id, "Registration accepted"),
            Err(e) => {
                warn!(error = %e, "Registration failed");
                return Err(AuthError::Authentication(e));
            }
        }

        self.login(email, secret).await
    }

    /// Drop the session. Never fails: a token that cannot be removed from
    /// storage is logged, and the client stops sending it for the rest of
    /// the process.
    pub fn logout(&mut self) {
        let previous = self.session.token.take();
        self.session = Session::default();
        self.state = SessionState::Anonymous;

        if let Err(e) = self.tokens().clear() {
            warn!(error = %e, store = self.tokens().kind(), "Failed to remove persisted token");
            if let Some(token) = self.tokens().load().ok().flatten().or(previous) {
                self.api.revoke(token);
            }
        }
        info!("Logged out");
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.session.is_loading
    }

    /// The client this session authorizes
    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}

//! Session manager: the single source of truth for who is signed in.
//!
//! ARCHITECTURE
//! ============
//! State lives in a `tokio::sync::watch` channel so the navigation gate and
//! any screen can observe transitions without polling. Every mutation
//! (restore, login, logout) runs under one async mutex, so a second call
//! queues behind the first instead of racing it on the network.
//!
//! LIFECYCLE
//! =========
//! A new manager starts in the restoring window (`is_loading = true`).
//! `restore` closes it exactly once. A successful login or any logout also
//! closes it, after which a late `restore` is a no-op. Nothing reopens it.
//!
//! TRADE-OFFS
//! ==========
//! Persistence after login is best-effort. The in-memory session is
//! authoritative for the current run; a failed store write only risks
//! losing the session across restarts, so it is logged, not returned.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::{Mutex, watch};

use crate::config::ClientConfig;
use crate::net::http::{ApiClient, ApiError};
use crate::net::types::{User, normalize_login_response};
use crate::store::{KeyValueStore, TOKEN_KEY, USER_KEY};

pub const ACCESS_RESTRICTED_MESSAGE: &str = "Acesso restrito. Apenas funcionários podem usar este aplicativo.";

// =============================================================================
// TYPES
// =============================================================================

/// Login input. Both fields are validated as non-empty by the caller.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Credentials were valid but the user lacks the staff role.
    #[error("{}", ACCESS_RESTRICTED_MESSAGE)]
    AccessRestricted,

    /// The backend accepted the login but sent no token.
    #[error("login response carried no token")]
    MissingToken,

    /// The login body did not contain a usable profile.
    #[error("malformed login response: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Restoring,
    Authenticated,
    Unauthenticated,
}

/// Process-wide authentication state.
///
/// `token` is present exactly when `user` is. While `is_loading` is true
/// neither field is meaningful.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_loading: bool,
}

impl SessionState {
    #[must_use]
    pub fn restoring() -> Self {
        Self { user: None, token: None, is_loading: true }
    }

    #[must_use]
    pub fn signed_out() -> Self {
        Self { user: None, token: None, is_loading: false }
    }

    #[must_use]
    pub fn signed_in(user: User, token: String) -> Self {
        Self { user: Some(user), token: Some(token), is_loading: false }
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        if self.is_loading {
            SessionStatus::Restoring
        } else if self.user.is_some() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Unauthenticated
        }
    }
}

#[derive(Serialize)]
struct PasswordResetRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct PasswordSetRequest<'a> {
    senha: &'a str,
}

// =============================================================================
// MANAGER
// =============================================================================

pub struct SessionManager {
    api: ApiClient,
    store: Arc<dyn KeyValueStore>,
    required_role: String,
    state: watch::Sender<SessionState>,
    mutation: Mutex<()>,
}

impl SessionManager {
    #[must_use]
    pub fn new(api: ApiClient, store: Arc<dyn KeyValueStore>, required_role: impl Into<String>) -> Self {
        let (state, _) = watch::channel(SessionState::restoring());
        Self { api, store, required_role: required_role.into(), state, mutation: Mutex::new(()) }
    }

    /// Build the HTTP client from `config` and wrap it in a manager.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig, store: Arc<dyn KeyValueStore>) -> Result<Self, ApiError> {
        let api = ApiClient::new(config)?;
        Ok(Self::new(api, store, config.required_role.clone()))
    }

    /// The shared HTTP client, for handing to service wrappers.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.state.borrow().status()
    }

    /// Signed-in user, or `None` while restoring or signed out.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        let state = self.state.borrow();
        if state.is_loading { None } else { state.user.clone() }
    }

    /// Receiver that sees every state transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Load the persisted session, once.
    ///
    /// Missing keys, unreadable storage and corrupt profile JSON all resolve
    /// to signed-out; none of them is reported as an error.
    pub async fn restore(&self) -> SessionStatus {
        let _guard = self.mutation.lock().await;
        if !self.state.borrow().is_loading {
            return self.status();
        }

        let next = match self.read_persisted().await {
            Some((user, token)) => {
                self.api.set_auth_token(Some(&token));
                tracing::info!(user_id = user.id, "session restored");
                SessionState::signed_in(user, token)
            }
            None => SessionState::signed_out(),
        };
        self.state.send_replace(next);
        self.status()
    }

    async fn read_persisted(&self) -> Option<(User, String)> {
        let stored_user = match self.store.get(USER_KEY).await {
            Ok(v) => v.filter(|s| !s.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "stored user unreadable; starting signed out");
                return None;
            }
        };
        let stored_token = match self.store.get(TOKEN_KEY).await {
            Ok(v) => v.filter(|s| !s.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "stored token unreadable; starting signed out");
                return None;
            }
        };

        let (Some(user_json), Some(token)) = (stored_user, stored_token) else {
            tracing::debug!("no complete stored session");
            return None;
        };
        match serde_json::from_str::<User>(&user_json) {
            Ok(user) => Some((user, token)),
            Err(e) => {
                tracing::warn!(error = %e, "stored user is corrupt; starting signed out");
                None
            }
        }
    }

    /// Authenticate against `POST /auth/login`.
    ///
    /// On success the auth header is set before the new state is published,
    /// then the token and profile are persisted.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AccessRestricted`] when the user lacks the
    /// required role, [`SessionError::MissingToken`] or
    /// [`SessionError::MalformedResponse`] for unusable bodies, and
    /// [`SessionError::Api`] for rejected credentials or transport failures.
    /// The session is left untouched in every error case.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, SessionError> {
        let _guard = self.mutation.lock().await;

        let body: Value = self
            .api
            .post_json(&["auth", "login"], &[], credentials)
            .await
            .inspect_err(|e| tracing::error!(error = %e, email = %credentials.email, "login request failed"))?;
        let payload = normalize_login_response(body).map_err(|e| SessionError::MalformedResponse(e.to_string()))?;

        if !payload.user.has_role(&self.required_role) {
            tracing::warn!(user_id = payload.user.id, role = %self.required_role, "login rejected: missing role");
            return Err(SessionError::AccessRestricted);
        }
        let Some(token) = payload.token else {
            tracing::error!(user_id = payload.user.id, "login response carried no token");
            return Err(SessionError::MissingToken);
        };
        let user = payload.user;

        self.api.set_auth_token(Some(&token));
        self.state
            .send_replace(SessionState::signed_in(user.clone(), token.clone()));
        self.persist(&user, &token).await;

        tracing::info!(user_id = user.id, "login succeeded");
        Ok(user)
    }

    async fn persist(&self, user: &User, token: &str) {
        if let Err(e) = self.store.set(TOKEN_KEY, token).await {
            tracing::warn!(error = %e, "failed to persist token");
        }
        match serde_json::to_string(user) {
            Ok(json) => {
                if let Err(e) = self.store.set(USER_KEY, &json).await {
                    tracing::warn!(error = %e, "failed to persist user");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize user"),
        }
    }

    /// Sign out locally. Never fails; storage errors are logged.
    pub async fn logout(&self) {
        let _guard = self.mutation.lock().await;

        self.state.send_replace(SessionState::signed_out());
        self.api.set_auth_token(None);
        for key in [USER_KEY, TOKEN_KEY] {
            if let Err(e) = self.store.remove(key).await {
                tracing::warn!(error = %e, key, "failed to clear stored session key");
            }
        }
        tracing::info!("logged out");
    }

    /// Ask the backend to email a password-reset link.
    ///
    /// # Errors
    ///
    /// Returns the backend or transport error unchanged.
    pub async fn request_password_reset(&self, email: &str) -> Result<String, ApiError> {
        self.api
            .post_for_message(&["esqueci-minha-senha"], &[], &PasswordResetRequest { email })
            .await
            .inspect_err(|e| tracing::error!(error = %e, "password reset request failed"))
    }

    /// Set a new password using the token from the reset email.
    ///
    /// # Errors
    ///
    /// Returns the backend or transport error unchanged.
    pub async fn set_password(&self, new_password: &str, reset_token: &str) -> Result<String, ApiError> {
        self.api
            .post_for_message(
                &["cadastroSenha"],
                &[("token", reset_token.to_owned())],
                &PasswordSetRequest { senha: new_password },
            )
            .await
            .inspect_err(|e| tracing::error!(error = %e, "password set failed"))
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

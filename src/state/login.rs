//! Login screen.

use crate::net::types::User;
use crate::session::{ACCESS_RESTRICTED_MESSAGE, Credentials, SessionError, SessionManager};
use crate::state::Alert;

pub const EMPTY_FIELDS_MESSAGE: &str = "Por favor, preencha e-mail e senha.";
pub const LOGIN_FAILED_TITLE: &str = "Falha no Login";
pub const LOGIN_FAILED_MESSAGE: &str = "E-mail ou senha incorretos. Tente novamente.";

/// Trim the email and require both fields.
///
/// # Errors
///
/// Returns the inline message to show when either field is blank.
pub fn validate_login_input(email: &str, password: &str) -> Result<Credentials, &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(EMPTY_FIELDS_MESSAGE);
    }
    Ok(Credentials::new(email, password))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub error: Option<String>,
    pub alert: Option<Alert>,
}

impl LoginForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt a login. Blank fields never reach the backend.
    ///
    /// Any failure clears the password and keeps the email. Navigation is
    /// left to the gate, which sees the session change on success.
    pub async fn submit(&mut self, session: &SessionManager) -> Option<User> {
        let credentials = match validate_login_input(&self.email, &self.password) {
            Ok(credentials) => credentials,
            Err(message) => {
                self.error = Some(message.to_owned());
                return None;
            }
        };
        self.error = None;
        self.alert = None;

        let outcome = session.login(&credentials).await;
        self.password.clear();
        match outcome {
            Ok(user) => Some(user),
            Err(SessionError::AccessRestricted) => {
                self.fail(ACCESS_RESTRICTED_MESSAGE);
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "login form submit failed");
                self.fail(LOGIN_FAILED_MESSAGE);
                None
            }
        }
    }

    fn fail(&mut self, message: &str) {
        self.error = Some(message.to_owned());
        self.alert = Some(Alert::new(LOGIN_FAILED_TITLE, message));
    }
}

#[cfg(test)]
#[path = "login_test.rs"]
mod tests;

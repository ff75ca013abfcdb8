//! Password recovery and reset screens.
//!
//! Both screens only pass through to the backend; neither touches the
//! session. Server messages are preferred over the local defaults.

use crate::session::SessionManager;
use crate::state::{Alert, ERROR_TITLE, SUCCESS_TITLE};

pub const EMPTY_EMAIL_MESSAGE: &str = "Por favor, digite seu e-mail.";
pub const RESET_LINK_SENT: &str = "Link de recuperação enviado com sucesso!";
pub const RESET_LINK_SENT_ALERT: &str = "Verifique seu e-mail para o link de recuperação.";
pub const RESET_LINK_FAILED: &str = "E-mail não cadastrado ou falha ao enviar.";
pub const RESET_LINK_FAILED_ALERT: &str = "Não foi possível processar sua solicitação. Verifique o e-mail digitado.";

pub const EMPTY_PASSWORD_MESSAGE: &str = "Por favor, preencha e confirme a nova senha.";
pub const PASSWORD_MISMATCH_MESSAGE: &str = "As senhas não coincidem.";
pub const MISSING_TOKEN_MESSAGE: &str = "Token inválido. Tente novamente a partir do seu e-mail.";
pub const PASSWORD_CHANGED_TITLE: &str = "Sucesso!";
pub const PASSWORD_CHANGED_ALERT: &str = "Sua senha foi alterada. Você já pode fazer o login.";
pub const PASSWORD_CHANGE_FAILED: &str = "Token expirado ou inválido. Tente novamente.";
pub const PASSWORD_CHANGE_FAILED_ALERT: &str = "Não foi possível alterar sua senha. O link pode ter expirado.";

// =============================================================================
// RECOVER
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoverPasswordForm {
    pub email: String,
    pub message: Option<String>,
    pub error: Option<String>,
    pub alert: Option<Alert>,
}

impl RecoverPasswordForm {
    /// Request a reset link. Returns true when the backend accepted it.
    pub async fn submit(&mut self, session: &SessionManager) -> bool {
        let email = self.email.trim().to_owned();
        if email.is_empty() {
            self.error = Some(EMPTY_EMAIL_MESSAGE.to_owned());
            return false;
        }
        self.error = None;
        self.message = None;

        match session.request_password_reset(&email).await {
            Ok(message) => {
                let message = if message.is_empty() { RESET_LINK_SENT.to_owned() } else { message };
                self.message = Some(message);
                self.alert = Some(Alert::new(SUCCESS_TITLE, RESET_LINK_SENT_ALERT));
                self.email.clear();
                true
            }
            Err(e) => {
                self.error = Some(e.server_message().unwrap_or(RESET_LINK_FAILED).to_owned());
                self.alert = Some(Alert::new(ERROR_TITLE, RESET_LINK_FAILED_ALERT));
                false
            }
        }
    }
}

// =============================================================================
// NEW PASSWORD
// =============================================================================

/// # Errors
///
/// Returns the inline message for the first failed rule.
pub fn validate_new_password(password: &str, confirmation: &str, token: Option<&str>) -> Result<(), &'static str> {
    if password.is_empty() || confirmation.is_empty() {
        return Err(EMPTY_PASSWORD_MESSAGE);
    }
    if password != confirmation {
        return Err(PASSWORD_MISMATCH_MESSAGE);
    }
    if token.is_none_or(|t| t.trim().is_empty()) {
        return Err(MISSING_TOKEN_MESSAGE);
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPasswordForm {
    /// Reset token from the emailed link.
    pub token: Option<String>,
    pub password: String,
    pub confirmation: String,
    pub error: Option<String>,
    pub alert: Option<Alert>,
}

impl NewPasswordForm {
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self { token: Some(token.into()), ..Self::default() }
    }

    /// Set the new password. Returns true on success, after which the
    /// caller should route back to login.
    pub async fn submit(&mut self, session: &SessionManager) -> bool {
        if let Err(message) = validate_new_password(&self.password, &self.confirmation, self.token.as_deref()) {
            self.error = Some(message.to_owned());
            return false;
        }
        let Some(token) = self.token.as_deref().map(str::trim) else {
            return false;
        };
        self.error = None;

        match session.set_password(&self.password, token).await {
            Ok(_) => {
                self.password.clear();
                self.confirmation.clear();
                self.alert = Some(Alert::new(PASSWORD_CHANGED_TITLE, PASSWORD_CHANGED_ALERT));
                true
            }
            Err(e) => {
                self.error = Some(e.server_message().unwrap_or(PASSWORD_CHANGE_FAILED).to_owned());
                self.alert = Some(Alert::new(ERROR_TITLE, PASSWORD_CHANGE_FAILED_ALERT));
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "password_test.rs"]
mod tests;

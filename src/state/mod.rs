//! Per-screen models.
//!
//! DESIGN
//! ======
//! Each screen is a plain struct holding its inputs, its loaded data and at
//! most one pending [`Alert`]. Operations take the services they need as
//! arguments and never panic on backend failure: errors are logged, turned
//! into an alert, and the screen falls back to an empty or unchanged state.
//! Rendering is left to whatever front end drives these models.

pub mod checkin;
pub mod history;
pub mod login;
pub mod materials;
pub mod password;
pub mod survey_answer;
pub mod surveys;

pub const ERROR_TITLE: &str = "Erro";
pub const SUCCESS_TITLE: &str = "Sucesso";

/// Modal message a screen wants shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    #[must_use]
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { title: title.into(), message: message.into() }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ERROR_TITLE, message)
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(SUCCESS_TITLE, message)
    }
}

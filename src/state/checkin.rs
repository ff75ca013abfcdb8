//! Daily check-in form on the dashboard.

use time::OffsetDateTime;

use crate::net::http::ApiClient;
use crate::net::types::{CheckIn, HumorLevel, NewCheckIn};
use crate::services;
use crate::state::Alert;

pub const MISSING_HUMOR_MESSAGE: &str = "Por favor, selecione como você está se sentindo.";
pub const CHECKIN_SAVED_MESSAGE: &str = "Check-in registrado com sucesso!";
pub const CHECKIN_FAILED_MESSAGE: &str = "Não foi possível registrar seu check-in. Tente novamente.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckInForm {
    pub humor: Option<HumorLevel>,
    pub comment: String,
    pub error: Option<String>,
    pub alert: Option<Alert>,
}

impl CheckInForm {
    /// Submit the form stamped at `at`.
    ///
    /// Success clears the form. Failure keeps humor and comment so the user
    /// can retry without re-entering them.
    pub async fn submit(&mut self, api: &ApiClient, employee_id: i64, at: OffsetDateTime) -> Option<CheckIn> {
        let Some(humor) = self.humor else {
            self.error = Some(MISSING_HUMOR_MESSAGE.to_owned());
            return None;
        };
        self.error = None;

        let checkin = match NewCheckIn::new(employee_id, humor, &self.comment, at) {
            Ok(checkin) => checkin,
            Err(e) => {
                tracing::error!(error = %e, "check-in timestamp format failed");
                self.alert = Some(Alert::error(CHECKIN_FAILED_MESSAGE));
                return None;
            }
        };

        match services::checkin::submit(api, &checkin).await {
            Ok(saved) => {
                self.humor = None;
                self.comment.clear();
                self.alert = Some(Alert::success(CHECKIN_SAVED_MESSAGE));
                Some(saved)
            }
            Err(_) => {
                self.alert = Some(Alert::error(CHECKIN_FAILED_MESSAGE));
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "checkin_test.rs"]
mod tests;

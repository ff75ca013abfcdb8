//! Survey list, split into pending and answered.

use crate::net::http::ApiClient;
use crate::net::types::SurveySummary;
use crate::services;
use crate::state::Alert;

pub const SURVEYS_FAILED_MESSAGE: &str = "Não foi possível carregar os questionários.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveyListView {
    pub loading: bool,
    pub surveys: Vec<SurveySummary>,
    pub alert: Option<Alert>,
}

impl SurveyListView {
    /// Reload the list. "None available" is an empty list with no alert;
    /// any other failure is an empty list with one.
    pub async fn load(&mut self, api: &ApiClient, employee_id: i64) {
        self.loading = true;
        self.alert = None;
        match services::surveys::list_for_employee(api, employee_id).await {
            Ok(surveys) => self.surveys = surveys,
            Err(_) => {
                self.surveys.clear();
                self.alert = Some(Alert::error(SURVEYS_FAILED_MESSAGE));
            }
        }
        self.loading = false;
    }

    pub fn pending(&self) -> impl Iterator<Item = &SurveySummary> {
        self.surveys.iter().filter(|s| !s.answered)
    }

    pub fn answered(&self) -> impl Iterator<Item = &SurveySummary> {
        self.surveys.iter().filter(|s| s.answered)
    }
}

#[cfg(test)]
#[path = "surveys_test.rs"]
mod tests;

//! Check-in history list.

use crate::net::http::ApiClient;
use crate::net::types::CheckIn;
use crate::services;
use crate::state::Alert;

pub const HISTORY_FAILED_MESSAGE: &str = "Erro ao carregar dados da API";

/// One rendered row of the history list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// `dd/MM/yyyy`, or the raw timestamp when it is not an ISO date.
    pub date: String,
    pub emoji: &'static str,
    pub label: &'static str,
    pub comment: String,
}

impl From<&CheckIn> for HistoryEntry {
    fn from(checkin: &CheckIn) -> Self {
        Self {
            date: checkin
                .display_date()
                .unwrap_or_else(|| checkin.date_time.clone()),
            emoji: checkin.humor_level.emoji(),
            label: checkin.humor_level.label(),
            comment: checkin.comment.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryView {
    pub loading: bool,
    pub entries: Vec<HistoryEntry>,
    pub alert: Option<Alert>,
}

impl HistoryView {
    /// Reload the list. On failure the list is emptied and an alert raised.
    pub async fn load(&mut self, api: &ApiClient, user_id: i64) {
        self.loading = true;
        self.alert = None;
        match services::checkin::history(api, user_id).await {
            Ok(checkins) => self.entries = checkins.iter().map(HistoryEntry::from).collect(),
            Err(_) => {
                self.entries.clear();
                self.alert = Some(Alert::error(HISTORY_FAILED_MESSAGE));
            }
        }
        self.loading = false;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;

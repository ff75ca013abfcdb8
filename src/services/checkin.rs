//! Mood check-ins.

use crate::net::http::{ApiClient, ApiError};
use crate::net::types::{CheckIn, NewCheckIn};

/// Record a check-in and return it as stored by the backend.
///
/// # Errors
///
/// Returns the transport, status or parse error from the request.
pub async fn submit(api: &ApiClient, checkin: &NewCheckIn) -> Result<CheckIn, ApiError> {
    api.post_json(&["checkin", "novo"], &[], checkin)
        .await
        .inspect_err(|e| tracing::error!(error = %e, employee_id = checkin.id_funcionario, "check-in submit failed"))
}

/// Every check-in recorded by `user_id`, in backend order.
///
/// # Errors
///
/// Returns the transport, status or parse error from the request.
pub async fn history(api: &ApiClient, user_id: i64) -> Result<Vec<CheckIn>, ApiError> {
    let id = user_id.to_string();
    api.get_json(&["checkin", "historico", &id], &[])
        .await
        .inspect_err(|e| tracing::error!(error = %e, user_id, "check-in history failed"))
}

#[cfg(test)]
#[path = "checkin_test.rs"]
mod tests;

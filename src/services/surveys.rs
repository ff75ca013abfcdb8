//! Surveys: listing, detail and answer submission.
//!
//! The list endpoint answers 404 with a "none available" message when the
//! employee has no surveys. That case is an empty list, not an error.

use crate::net::http::{ApiClient, ApiError};
use crate::net::types::{AnswerPayload, Survey, SurveySummary};

const NONE_AVAILABLE: &str = "Nenhum questionário disponível";

/// True for the backend's "no surveys for this employee" reply.
#[must_use]
pub fn is_none_available(error: &ApiError) -> bool {
    error.is_not_found() && error.server_message().is_some_and(|m| m.contains(NONE_AVAILABLE))
}

/// Surveys assigned to `employee_id`.
///
/// # Errors
///
/// Returns any error other than the "none available" 404.
pub async fn list_for_employee(api: &ApiClient, employee_id: i64) -> Result<Vec<SurveySummary>, ApiError> {
    match api
        .get_json(&["questionarios"], &[("funcId", employee_id.to_string())])
        .await
    {
        Ok(surveys) => Ok(surveys),
        Err(e) if is_none_available(&e) => {
            tracing::debug!(employee_id, "no surveys available");
            Ok(Vec::new())
        }
        Err(e) => {
            tracing::error!(error = %e, employee_id, "survey list failed");
            Err(e)
        }
    }
}

/// # Errors
///
/// Returns the transport, status or parse error from the request.
pub async fn fetch(api: &ApiClient, survey_id: i64) -> Result<Survey, ApiError> {
    let id = survey_id.to_string();
    api.get_json(&["questionario", &id], &[])
        .await
        .inspect_err(|e| tracing::error!(error = %e, survey_id, "survey fetch failed"))
}

/// # Errors
///
/// Returns the transport or status error from the request.
pub async fn submit_answers(
    api: &ApiClient,
    survey_id: i64,
    employee_id: i64,
    answers: &[AnswerPayload],
) -> Result<(), ApiError> {
    api.post_unit(
        &["questionario", "resposta"],
        &[("surveyId", survey_id.to_string()), ("funcId", employee_id.to_string())],
        answers,
    )
    .await
    .inspect_err(|e| tracing::error!(error = %e, survey_id, employee_id, "survey answers submit failed"))
}

#[cfg(test)]
#[path = "surveys_test.rs"]
mod tests;

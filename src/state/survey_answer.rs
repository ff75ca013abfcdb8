//! Answering one survey.
//!
//! DESIGN
//! ======
//! `AnswerSheet` owns the survey and the answers given so far, keyed by
//! question id. Every mutation is checked against the question's kind and
//! option list, so a sheet can never hold an answer the backend would
//! reject as foreign. Submission needs every question answered, open-text
//! ones included, and at least one question to answer.

use std::collections::{BTreeMap, BTreeSet};

use crate::net::http::ApiClient;
use crate::net::types::{AnswerPayload, Question, QuestionKind, Survey};
use crate::services;
use crate::state::Alert;

pub const SURVEY_LOAD_FAILED_MESSAGE: &str = "Erro ao carregar questionário";
pub const INCOMPLETE_MESSAGE: &str = "Responda todas as perguntas antes de enviar.";
pub const ANSWERS_SENT_MESSAGE: &str = "Respostas enviadas com sucesso";
pub const ANSWERS_FAILED_MESSAGE: &str = "Erro ao enviar respostas";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnswerError {
    #[error("question {0} is not part of this survey")]
    UnknownQuestion(i64),

    #[error("option {option_id} does not belong to question {question_id}")]
    UnknownOption { question_id: i64, option_id: i64 },

    #[error("question {0} does not accept this kind of answer")]
    WrongKind(i64),

    #[error("question {0} has not been answered")]
    Incomplete(i64),

    #[error("survey has no questions to answer")]
    NoQuestions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Choice(i64),
    Choices(BTreeSet<i64>),
    Text(String),
}

// =============================================================================
// ANSWER SHEET
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSheet {
    survey: Survey,
    answers: BTreeMap<i64, Answer>,
}

impl AnswerSheet {
    #[must_use]
    pub fn new(survey: Survey) -> Self {
        Self { survey, answers: BTreeMap::new() }
    }

    #[must_use]
    pub fn survey(&self) -> &Survey {
        &self.survey
    }

    #[must_use]
    pub fn answer(&self, question_id: i64) -> Option<&Answer> {
        self.answers.get(&question_id)
    }

    fn question(&self, question_id: i64) -> Result<&Question, AnswerError> {
        self.survey
            .questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or(AnswerError::UnknownQuestion(question_id))
    }

    fn check_option(question: &Question, option_id: i64) -> Result<(), AnswerError> {
        if question.kind.options().iter().any(|o| o.id == option_id) {
            Ok(())
        } else {
            Err(AnswerError::UnknownOption { question_id: question.id, option_id })
        }
    }

    /// Select the single option of a single-choice question, replacing any
    /// earlier pick.
    ///
    /// # Errors
    ///
    /// Fails for unknown questions, non-single-choice questions and options
    /// outside the question's list.
    pub fn choose(&mut self, question_id: i64, option_id: i64) -> Result<(), AnswerError> {
        let question = self.question(question_id)?;
        if !matches!(question.kind, QuestionKind::SingleChoice { .. }) {
            return Err(AnswerError::WrongKind(question_id));
        }
        Self::check_option(question, option_id)?;
        self.answers
            .insert(question_id, Answer::Choice(option_id));
        Ok(())
    }

    /// Flip one option of a multiple-choice question. Returns whether it is
    /// selected afterwards. Deselecting the last option unanswers the question.
    ///
    /// # Errors
    ///
    /// Fails for unknown questions, non-multiple-choice questions and options
    /// outside the question's list.
    pub fn toggle(&mut self, question_id: i64, option_id: i64) -> Result<bool, AnswerError> {
        let question = self.question(question_id)?;
        if !matches!(question.kind, QuestionKind::MultipleChoice { .. }) {
            return Err(AnswerError::WrongKind(question_id));
        }
        Self::check_option(question, option_id)?;

        let mut selected = match self.answers.remove(&question_id) {
            Some(Answer::Choices(set)) => set,
            _ => BTreeSet::new(),
        };
        let now_selected = if selected.remove(&option_id) {
            false
        } else {
            selected.insert(option_id);
            true
        };
        if !selected.is_empty() {
            self.answers
                .insert(question_id, Answer::Choices(selected));
        }
        Ok(now_selected)
    }

    /// Set the text of an open question. Blank text unanswers it.
    ///
    /// # Errors
    ///
    /// Fails for unknown questions and choice questions.
    pub fn write(&mut self, question_id: i64, text: &str) -> Result<(), AnswerError> {
        let question = self.question(question_id)?;
        if question.kind != QuestionKind::OpenText {
            return Err(AnswerError::WrongKind(question_id));
        }
        let text = text.trim();
        if text.is_empty() {
            self.answers.remove(&question_id);
        } else {
            self.answers
                .insert(question_id, Answer::Text(text.to_owned()));
        }
        Ok(())
    }

    /// First question, in survey order, still lacking an answer.
    #[must_use]
    pub fn first_unanswered(&self) -> Option<i64> {
        self.survey
            .questions
            .iter()
            .map(|q| q.id)
            .find(|id| !self.answers.contains_key(id))
    }

    /// Every question answered. A survey without questions is never complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.survey.questions.is_empty() && self.first_unanswered().is_none()
    }

    /// Request body for submission, in survey order. A multiple-choice
    /// question yields one payload per selected option.
    ///
    /// # Errors
    ///
    /// Returns [`AnswerError::Incomplete`] naming the first unanswered question,
    /// or [`AnswerError::NoQuestions`] for an empty survey.
    pub fn payloads(&self) -> Result<Vec<AnswerPayload>, AnswerError> {
        if self.survey.questions.is_empty() {
            return Err(AnswerError::NoQuestions);
        }
        if let Some(id) = self.first_unanswered() {
            return Err(AnswerError::Incomplete(id));
        }
        let mut out = Vec::with_capacity(self.answers.len());
        for question in &self.survey.questions {
            let question_id = question.id;
            match self.answers.get(&question_id) {
                Some(Answer::Choice(option_id)) => {
                    out.push(AnswerPayload { question_id, option_id: Some(*option_id), texto: None });
                }
                Some(Answer::Choices(options)) => out.extend(
                    options
                        .iter()
                        .map(|id| AnswerPayload { question_id, option_id: Some(*id), texto: None }),
                ),
                Some(Answer::Text(text)) => {
                    out.push(AnswerPayload { question_id, option_id: None, texto: Some(text.clone()) });
                }
                None => return Err(AnswerError::Incomplete(question_id)),
            }
        }
        Ok(out)
    }
}

// =============================================================================
// SCREEN
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveyAnswerView {
    pub loading: bool,
    pub sheet: Option<AnswerSheet>,
    pub submitted: bool,
    pub alert: Option<Alert>,
}

impl SurveyAnswerView {
    /// Load survey `survey_id` into a fresh sheet.
    pub async fn load(&mut self, api: &ApiClient, survey_id: i64) {
        self.loading = true;
        self.alert = None;
        self.submitted = false;
        match services::surveys::fetch(api, survey_id).await {
            Ok(survey) => self.sheet = Some(AnswerSheet::new(survey)),
            Err(_) => {
                self.sheet = None;
                self.alert = Some(Alert::error(SURVEY_LOAD_FAILED_MESSAGE));
            }
        }
        self.loading = false;
    }

    /// Whether the submit button is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.submitted && self.sheet.as_ref().is_some_and(AnswerSheet::is_complete)
    }

    /// Send the answers. A failed send keeps the sheet for a retry.
    pub async fn submit(&mut self, api: &ApiClient, employee_id: i64) -> bool {
        let Some(sheet) = &self.sheet else {
            return false;
        };
        let payloads = match sheet.payloads() {
            Ok(payloads) => payloads,
            Err(e) => {
                tracing::debug!(error = %e, "survey submit blocked");
                self.alert = Some(Alert::error(INCOMPLETE_MESSAGE));
                return false;
            }
        };
        let survey_id = sheet.survey().id;

        match services::surveys::submit_answers(api, survey_id, employee_id, &payloads).await {
            Ok(()) => {
                self.submitted = true;
                self.alert = Some(Alert::success(ANSWERS_SENT_MESSAGE));
                true
            }
            Err(_) => {
                self.alert = Some(Alert::error(ANSWERS_FAILED_MESSAGE));
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "survey_answer_test.rs"]
mod tests;

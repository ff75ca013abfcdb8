use super::*;
use crate::test_support::FakeBackend;
use serde_json::{Value, json};

fn survey_json() -> Value {
    json!({
        "id": 5,
        "titulo": "Ergonomia",
        "perguntas": [
            { "id": 1, "texto": "Sente dor?", "tipo": "UNICA", "opcoes": [{ "id": 10, "texto": "Sim" }, { "id": 11, "texto": "Não" }] },
            { "id": 2, "texto": "Onde?", "tipo": "MULTIPLA", "opcoes": [{ "id": 20, "texto": "Costas" }, { "id": 21, "texto": "Pescoço" }, { "id": 22, "texto": "Punho" }] },
            { "id": 3, "texto": "Comentários", "tipo": "TEXTO" },
        ],
    })
}

fn sheet() -> AnswerSheet {
    AnswerSheet::new(serde_json::from_value(survey_json()).unwrap())
}

fn complete(sheet: &mut AnswerSheet) {
    sheet.choose(1, 10).unwrap();
    sheet.toggle(2, 20).unwrap();
    sheet.toggle(2, 22).unwrap();
    sheet.write(3, "cadeira ruim").unwrap();
}

// =============================================================================
// AnswerSheet
// =============================================================================

#[test]
fn choose_validates_question_kind_and_option() {
    let mut sheet = sheet();
    assert_eq!(sheet.choose(99, 10), Err(AnswerError::UnknownQuestion(99)));
    assert_eq!(sheet.choose(1, 20), Err(AnswerError::UnknownOption { question_id: 1, option_id: 20 }));
    assert_eq!(sheet.choose(2, 20), Err(AnswerError::WrongKind(2)));

    sheet.choose(1, 10).unwrap();
    sheet.choose(1, 11).unwrap();
    assert_eq!(sheet.answer(1), Some(&Answer::Choice(11)));
}

#[test]
fn toggle_adds_and_removes() {
    let mut sheet = sheet();
    assert_eq!(sheet.toggle(2, 20), Ok(true));
    assert_eq!(sheet.toggle(2, 21), Ok(true));
    assert_eq!(sheet.toggle(2, 20), Ok(false));
    assert_eq!(sheet.answer(2), Some(&Answer::Choices([21].into())));

    assert_eq!(sheet.toggle(2, 21), Ok(false));
    assert_eq!(sheet.answer(2), None);
    assert_eq!(sheet.toggle(1, 10), Err(AnswerError::WrongKind(1)));
    assert_eq!(sheet.toggle(2, 10), Err(AnswerError::UnknownOption { question_id: 2, option_id: 10 }));
}

#[test]
fn write_trims_and_blank_unanswers() {
    let mut sheet = sheet();
    sheet.write(3, "  algo  ").unwrap();
    assert_eq!(sheet.answer(3), Some(&Answer::Text("algo".into())));
    sheet.write(3, "   ").unwrap();
    assert_eq!(sheet.answer(3), None);
    assert_eq!(sheet.write(1, "texto"), Err(AnswerError::WrongKind(1)));
}

#[test]
fn completeness_tracks_first_unanswered() {
    let mut sheet = sheet();
    assert_eq!(sheet.first_unanswered(), Some(1));
    assert_eq!(sheet.payloads(), Err(AnswerError::Incomplete(1)));
    sheet.choose(1, 10).unwrap();
    sheet.write(3, "x").unwrap();
    assert_eq!(sheet.first_unanswered(), Some(2));
    assert!(!sheet.is_complete());
    sheet.toggle(2, 21).unwrap();
    assert!(sheet.is_complete());
}

#[test]
fn payloads_in_survey_order_one_per_selection() {
    let mut sheet = sheet();
    complete(&mut sheet);
    let payloads = sheet.payloads().unwrap();
    assert_eq!(
        payloads,
        vec![
            AnswerPayload { question_id: 1, option_id: Some(10), texto: None },
            AnswerPayload { question_id: 2, option_id: Some(20), texto: None },
            AnswerPayload { question_id: 2, option_id: Some(22), texto: None },
            AnswerPayload { question_id: 3, option_id: None, texto: Some("cadeira ruim".into()) },
        ]
    );
}

#[test]
fn description_questions_answer_on_scale() {
    let survey: Survey = serde_json::from_value(json!({
        "id": 7,
        "title": "Clima",
        "description": "Sente-se bem?; Dorme bem?",
    }))
    .unwrap();
    let mut sheet = AnswerSheet::new(survey);
    assert!(!sheet.is_complete());
    assert_eq!(sheet.choose(1, 6), Err(AnswerError::UnknownOption { question_id: 1, option_id: 6 }));

    sheet.choose(1, 4).unwrap();
    sheet.choose(2, 2).unwrap();
    assert!(sheet.is_complete());
    assert_eq!(
        sheet.payloads().unwrap(),
        vec![
            AnswerPayload { question_id: 1, option_id: Some(4), texto: None },
            AnswerPayload { question_id: 2, option_id: Some(2), texto: None },
        ]
    );
}

#[test]
fn survey_without_questions_never_completes() {
    let survey: Survey = serde_json::from_value(json!({ "id": 8, "titulo": "Vazio" })).unwrap();
    let sheet = AnswerSheet::new(survey);
    assert_eq!(sheet.first_unanswered(), None);
    assert!(!sheet.is_complete());
    assert_eq!(sheet.payloads(), Err(AnswerError::NoQuestions));
}

// =============================================================================
// SurveyAnswerView
// =============================================================================

async fn backend_with_survey() -> FakeBackend {
    let backend = FakeBackend::spawn().await;
    backend
        .state
        .survey_details
        .lock()
        .unwrap()
        .insert(5, survey_json());
    backend
}

#[tokio::test]
async fn load_failure_alerts() {
    let backend = FakeBackend::spawn().await;
    let mut view = SurveyAnswerView::default();
    view.load(&backend.api(), 5).await;
    assert_eq!(view.sheet, None);
    assert_eq!(view.alert, Some(Alert::error(SURVEY_LOAD_FAILED_MESSAGE)));
    assert!(!view.can_submit());
}

#[tokio::test]
async fn submit_enabled_only_when_complete() {
    let backend = backend_with_survey().await;
    let mut view = SurveyAnswerView::default();
    view.load(&backend.api(), 5).await;
    assert!(!view.can_submit());

    assert!(!view.submit(&backend.api(), 9).await);
    assert_eq!(view.alert, Some(Alert::error(INCOMPLETE_MESSAGE)));
    assert!(backend.requests_for("answers").is_empty());

    complete(view.sheet.as_mut().unwrap());
    assert!(view.can_submit());
    assert!(view.submit(&backend.api(), 9).await);
    assert!(view.submitted);
    assert!(!view.can_submit());
    assert_eq!(view.alert, Some(Alert::success(ANSWERS_SENT_MESSAGE)));

    let sent = &backend.requests_for("answers")[0];
    assert_eq!(sent.query.get("surveyId").map(String::as_str), Some("5"));
    assert_eq!(sent.body.as_array().map(Vec::len), Some(4));
}

#[tokio::test]
async fn empty_survey_is_not_sent() {
    let backend = FakeBackend::spawn().await;
    backend
        .state
        .survey_details
        .lock()
        .unwrap()
        .insert(8, json!({ "id": 8, "titulo": "Vazio", "perguntas": [] }));
    let mut view = SurveyAnswerView::default();
    view.load(&backend.api(), 8).await;
    assert!(view.sheet.is_some());
    assert!(!view.can_submit());

    assert!(!view.submit(&backend.api(), 9).await);
    assert_eq!(view.alert, Some(Alert::error(INCOMPLETE_MESSAGE)));
    assert!(backend.requests_for("answers").is_empty());
}

#[tokio::test]
async fn failed_submit_keeps_answers() {
    let backend = backend_with_survey().await;
    backend.fail("answers", 500, json!({ "message": "falha" }));
    let mut view = SurveyAnswerView::default();
    view.load(&backend.api(), 5).await;
    complete(view.sheet.as_mut().unwrap());

    assert!(!view.submit(&backend.api(), 9).await);
    assert_eq!(view.alert, Some(Alert::error(ANSWERS_FAILED_MESSAGE)));
    assert!(view.can_submit());
    assert_eq!(view.sheet.as_ref().and_then(|s| s.answer(3)), Some(&Answer::Text("cadeira ruim".into())));
}

use super::*;
use crate::net::types::User;
use serde_json::json;

fn staff() -> User {
    serde_json::from_value(json!({ "id": 1, "name": "Ana", "role": ["FUNC"] })).unwrap()
}

// =============================================================================
// gate
// =============================================================================

#[test]
fn gate_while_restoring_is_loading() {
    assert_eq!(gate(&SessionState::restoring()), NavTree::Loading);
}

#[test]
fn gate_restoring_ignores_stale_user() {
    let state = SessionState { user: Some(staff()), token: Some("t".into()), is_loading: true };
    assert_eq!(gate(&state), NavTree::Loading);
}

#[test]
fn gate_signed_out_lists_auth_screens() {
    let tree = gate(&SessionState::signed_out());
    assert_eq!(
        tree,
        NavTree::SignedOut { screens: vec![AuthScreen::Login, AuthScreen::RecoverPassword, AuthScreen::ResetPassword] }
    );
    assert_eq!(tree.initial_route(), Some(Route::Auth(AuthScreen::Login)));
}

#[test]
fn gate_signed_in_lists_tabs_and_modal() {
    let tree = gate(&SessionState::signed_in(staff(), "t".into()));
    let NavTree::SignedIn { tabs, modals } = &tree else {
        panic!("expected signed-in tree, got {tree:?}");
    };
    assert_eq!(tabs, &MainTab::ALL.to_vec());
    assert_eq!(modals, &vec![ModalScreen::AnswerSurvey]);
    assert_eq!(tree.initial_route(), Some(Route::Tab(MainTab::Dashboard)));
}

#[test]
fn tab_titles_and_icons() {
    let titles: Vec<_> = MainTab::ALL.iter().map(|t| t.title()).collect();
    assert_eq!(titles, ["Dashboard", "Histórico", "Material de Apoio", "Questionários"]);
    assert_eq!(MainTab::History.icon(), "time-outline");
    assert_eq!(MainTab::Surveys.icon(), "list-outline");
}

// =============================================================================
// routes
// =============================================================================

#[test]
fn validate_accepts_routes_of_own_tree() {
    let signed_in = gate(&SessionState::signed_in(staff(), "t".into()));
    assert!(signed_in.validate(Route::Tab(MainTab::Surveys)).is_ok());
    assert!(signed_in.validate(Route::AnswerSurvey { survey_id: 3 }).is_ok());

    let signed_out = gate(&SessionState::signed_out());
    assert!(signed_out.validate(Route::Auth(AuthScreen::ResetPassword)).is_ok());
}

#[test]
fn validate_rejects_cross_tree_routes() {
    let signed_in = gate(&SessionState::signed_in(staff(), "t".into()));
    let err = signed_in.validate(Route::Auth(AuthScreen::Login)).unwrap_err();
    assert_eq!(err.status, SessionStatus::Authenticated);

    let signed_out = gate(&SessionState::signed_out());
    assert!(signed_out.validate(Route::Tab(MainTab::Dashboard)).is_err());
    assert!(signed_out.validate(Route::AnswerSurvey { survey_id: 1 }).is_err());
}

#[test]
fn validate_rejects_everything_while_loading() {
    let err = NavTree::Loading.validate(Route::Auth(AuthScreen::Login)).unwrap_err();
    assert_eq!(err.status, SessionStatus::Restoring);
    assert!(err.to_string().contains("Restoring"));
}

// =============================================================================
// NavigationGate
// =============================================================================

#[tokio::test]
async fn gate_follows_session_changes() {
    let (tx, rx) = watch::channel(SessionState::restoring());
    let mut nav = NavigationGate::new(rx);
    assert_eq!(nav.current(), NavTree::Loading);

    tx.send_replace(SessionState::signed_out());
    assert_eq!(nav.next_change().await.map(|t| t.status()), Some(SessionStatus::Unauthenticated));

    tx.send_replace(SessionState::signed_in(staff(), "t".into()));
    assert_eq!(nav.next_change().await.map(|t| t.status()), Some(SessionStatus::Authenticated));
    assert_eq!(nav.current().status(), SessionStatus::Authenticated);
}

#[tokio::test]
async fn gate_ends_when_session_dropped() {
    let (tx, rx) = watch::channel(SessionState::restoring());
    let mut nav = NavigationGate::new(rx);
    drop(tx);
    assert_eq!(nav.next_change().await, None);
}

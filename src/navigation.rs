//! Navigation gate: which screen tree the app may show.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every front end applies the same rule: nothing but a loading indicator
//! while the session is restoring, the auth screens when signed out, and the
//! main tabs when signed in. `gate` is that rule as a pure function;
//! `NavigationGate` re-applies it on every session change.

use tokio::sync::watch;

use crate::session::{SessionState, SessionStatus};

// =============================================================================
// SCREENS
// =============================================================================

/// Screens reachable without a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthScreen {
    Login,
    RecoverPassword,
    ResetPassword,
}

impl AuthScreen {
    pub const ALL: [Self; 3] = [Self::Login, Self::RecoverPassword, Self::ResetPassword];
}

/// Bottom tabs of the signed-in app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MainTab {
    Dashboard,
    History,
    SupportMaterials,
    Surveys,
}

impl MainTab {
    pub const ALL: [Self; 4] = [Self::Dashboard, Self::History, Self::SupportMaterials, Self::Surveys];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::History => "Histórico",
            Self::SupportMaterials => "Material de Apoio",
            Self::Surveys => "Questionários",
        }
    }

    /// Ionicons name used by the mobile front end.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Dashboard => "home-outline",
            Self::History => "time-outline",
            Self::SupportMaterials => "book-outline",
            Self::Surveys => "list-outline",
        }
    }
}

/// Screens stacked above the tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalScreen {
    AnswerSurvey,
}

// =============================================================================
// TREE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavTree {
    Loading,
    SignedOut { screens: Vec<AuthScreen> },
    SignedIn { tabs: Vec<MainTab>, modals: Vec<ModalScreen> },
}

impl NavTree {
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        match self {
            Self::Loading => SessionStatus::Restoring,
            Self::SignedOut { .. } => SessionStatus::Unauthenticated,
            Self::SignedIn { .. } => SessionStatus::Authenticated,
        }
    }

    /// Screen shown when this tree is first mounted.
    #[must_use]
    pub fn initial_route(&self) -> Option<Route> {
        match self {
            Self::Loading => None,
            Self::SignedOut { .. } => Some(Route::Auth(AuthScreen::Login)),
            Self::SignedIn { .. } => Some(Route::Tab(MainTab::Dashboard)),
        }
    }

    /// Check that `route` belongs to this tree.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] when the route lives in another tree, or when
    /// anything is requested while loading.
    pub fn validate(&self, route: Route) -> Result<Route, RouteError> {
        let allowed = match (self, route) {
            (Self::SignedOut { screens }, Route::Auth(screen)) => screens.contains(&screen),
            (Self::SignedIn { tabs, .. }, Route::Tab(tab)) => tabs.contains(&tab),
            (Self::SignedIn { modals, .. }, Route::AnswerSurvey { .. }) => modals.contains(&ModalScreen::AnswerSurvey),
            _ => false,
        };
        if allowed { Ok(route) } else { Err(RouteError { route, status: self.status() }) }
    }
}

/// Map session state onto the tree the app may show.
///
/// Never yields a signed-in or signed-out tree while restoring.
#[must_use]
pub fn gate(state: &SessionState) -> NavTree {
    match state.status() {
        SessionStatus::Restoring => NavTree::Loading,
        SessionStatus::Unauthenticated => NavTree::SignedOut { screens: AuthScreen::ALL.to_vec() },
        SessionStatus::Authenticated => NavTree::SignedIn {
            tabs: MainTab::ALL.to_vec(),
            modals: vec![ModalScreen::AnswerSurvey],
        },
    }
}

// =============================================================================
// ROUTES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Auth(AuthScreen),
    Tab(MainTab),
    AnswerSurvey { survey_id: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("route {route:?} is not available while {status:?}")]
pub struct RouteError {
    pub route: Route,
    pub status: SessionStatus,
}

// =============================================================================
// WATCHER
// =============================================================================

/// Re-evaluates [`gate`] whenever the session changes.
pub struct NavigationGate {
    session: watch::Receiver<SessionState>,
}

impl NavigationGate {
    #[must_use]
    pub fn new(session: watch::Receiver<SessionState>) -> Self {
        Self { session }
    }

    /// Tree for the latest session state.
    #[must_use]
    pub fn current(&self) -> NavTree {
        gate(&self.session.borrow())
    }

    /// Wait for the next session change and return the new tree.
    ///
    /// Returns `None` once the session manager has been dropped.
    pub async fn next_change(&mut self) -> Option<NavTree> {
        self.session.changed().await.ok()?;
        let tree = gate(&self.session.borrow_and_update());
        tracing::debug!(status = ?tree.status(), "navigation tree re-evaluated");
        Some(tree)
    }
}

#[cfg(test)]
#[path = "navigation_test.rs"]
mod tests;

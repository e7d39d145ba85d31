//! Navigation shell logic
//!
//! Auth reconciliation against the backend, the role-aware menu, and the
//! route guards shared by every frontend.

use tracing::{info, warn};

use crate::client::ClinicApi;
use crate::models::{AuthCheck, Role};
use crate::routes::Route;
use crate::session::{SessionState, SessionStore};

/// Result of syncing local auth flags with the backend
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    /// Both auth slices now mirror the backend
    Applied(AuthCheck),
    /// Backend answered but named no role; session untouched
    Ignored(AuthCheck),
    /// The check itself failed; session untouched
    Failed(String),
}

impl ReconcileOutcome {
    /// Transient notification to show, if any
    pub fn notification(&self) -> Option<String> {
        match self {
            ReconcileOutcome::Failed(detail) => Some(detail.clone()),
            _ => None,
        }
    }
}

/// Fold the answer of `GET /api/auth/checkAuth` into the session
pub fn apply_reconciliation(
    session: &mut SessionStore,
    result: Result<AuthCheck, String>,
) -> ReconcileOutcome {
    match result {
        Ok(check) => {
            if session.apply_auth_check(&check) {
                info!(
                    "Session reconciled (authenticated: {}, role: {:?})",
                    check.authenticated, check.role
                );
                ReconcileOutcome::Applied(check)
            } else {
                ReconcileOutcome::Ignored(check)
            }
        }
        Err(detail) => {
            warn!("Auth check failed, keeping session: {}", detail);
            ReconcileOutcome::Failed(detail)
        }
    }
}

/// Ask the backend who we are and update the session
///
/// Run at startup and after explicit sign-in, sign-up or logout.
pub async fn reconcile(api: &dyn ClinicApi, session: &mut SessionStore) -> ReconcileOutcome {
    let result = api.check_auth().await.map_err(|e| e.to_string());
    apply_reconciliation(session, result)
}

/// What a menu entry does when activated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    Navigate(Route),
    Logout(Role),
    ToggleTheme,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub action: MenuAction,
}

impl MenuItem {
    fn new(label: impl Into<String>, action: MenuAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// Menu for the current session
///
/// Signed-in roles get their own pages and a logout entry; roles that are
/// not signed in get sign-in and sign-up entries.
pub fn menu_items(state: &SessionState) -> Vec<MenuItem> {
    let mut items = vec![MenuItem::new("Home", MenuAction::Navigate(Route::Home))];

    if state.doctor_authenticated {
        items.push(MenuItem::new(
            "Profile",
            MenuAction::Navigate(Route::DoctorProfile(state.doctor_id.clone())),
        ));
        items.push(MenuItem::new(
            "Consultations",
            MenuAction::Navigate(Route::DoctorConsultations(state.doctor_id.clone())),
        ));
        items.push(MenuItem::new(
            "Doctor Logout",
            MenuAction::Logout(Role::Doctor),
        ));
    }

    if state.patient_authenticated {
        items.push(MenuItem::new(
            "Patient Logout",
            MenuAction::Logout(Role::Patient),
        ));
    }

    for role in [Role::Doctor, Role::Patient] {
        if !state.is_authenticated(role) {
            items.push(MenuItem::new(
                format!("{} Sign In", role),
                MenuAction::Navigate(Route::SignIn(role)),
            ));
            items.push(MenuItem::new(
                format!("{} Sign Up", role),
                MenuAction::Navigate(Route::SignUp(role)),
            ));
        }
    }

    items.push(MenuItem::new("Toggle Theme", MenuAction::ToggleTheme));
    items
}

/// Where a doctor card leads: the consultation form for a signed-in
/// patient, patient sign-in otherwise
pub fn consult_route(state: &SessionState, doctor_id: &str) -> Route {
    if state.patient_authenticated {
        Route::Consult(doctor_id.to_string())
    } else {
        Route::SignIn(Role::Patient)
    }
}

/// Route actually shown for a navigation request
///
/// Auth forms for a role that is already signed in go home, and the
/// consultation form needs a signed-in patient.
pub fn resolve_route(state: &SessionState, requested: Route) -> Route {
    if let Some(role) = requested.auth_form_role() {
        if state.is_authenticated(role) {
            return Route::Home;
        }
    }
    match &requested {
        Route::Consult(doctor_id) => consult_route(state, doctor_id),
        _ => requested,
    }
}

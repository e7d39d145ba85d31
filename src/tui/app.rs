//! Application State Management
//!
//! This module owns the TUI's state: the session store, the current route
//! and the per-screen state. All mutation happens here, either in response
//! to a key event or to the result event of a backend request.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::auth::{
    record_logout, record_sign_in, LOGOUT_SUCCESS, SIGN_IN_SUCCESS, SIGN_UP_SUCCESS,
};
use crate::client::ClinicApi;
use crate::consultation::{SubmitError, WizardStep, PAYMENT_SUCCESS, SUBMIT_SUCCESS};
use crate::models::{Consultation, DoctorProfile, DoctorSummary};
use crate::shell::{
    apply_reconciliation, consult_route, menu_items, resolve_route, MenuAction, MenuItem,
};
use crate::tui::events::{ApiTaskRunner, Event};
use crate::tui::screens::consultation::ConsultationScreenState;
use crate::tui::screens::sign_in::SignInState;
use crate::tui::screens::sign_up::SignUpState;
use crate::tui::utils::Palette;
use crate::{Role, Route, SessionStore};

/// How long success and error notifications stay on screen
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// Data fetched for a view
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteData<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Default for RemoteData<T> {
    fn default() -> Self {
        RemoteData::Idle
    }
}

/// Status line state for user-initiated actions
#[derive(Debug, Clone, PartialEq)]
pub enum LoadingState {
    Idle,
    Loading { message: String },
    Success { message: String, at: Instant },
    Error { message: String, at: Instant },
}

impl LoadingState {
    pub fn loading(message: impl Into<String>) -> Self {
        Self::Loading {
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::Success {
            message: message.into(),
            at: Instant::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            at: Instant::now(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Loading { message }
            | Self::Success { message, .. }
            | Self::Error { message, .. } => Some(message),
        }
    }

    /// Whether a notification has been shown long enough
    pub fn is_expired(&self, now: Instant) -> bool {
        match self {
            Self::Success { at, .. } | Self::Error { at, .. } => {
                now.duration_since(*at) >= NOTIFICATION_TTL
            }
            _ => false,
        }
    }
}

/// Global application state
pub struct AppState {
    /// Route currently shown
    pub route: Route,
    /// Status line
    pub loading_state: LoadingState,
    /// Doctor listing on the home screen
    pub doctors: RemoteData<Vec<DoctorSummary>>,
    pub selected_doctor: usize,
    pub sign_in: SignInState,
    pub sign_up: SignUpState,
    /// Present only while the consultation route is shown
    pub consultation: Option<ConsultationScreenState>,
    pub profile: RemoteData<DoctorProfile>,
    pub consultations: RemoteData<Vec<Consultation>>,
    pub selected_consultation: usize,
    pub should_quit: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            route: Route::Home,
            loading_state: LoadingState::Idle,
            doctors: RemoteData::Idle,
            selected_doctor: 0,
            sign_in: SignInState::new(Role::Patient),
            sign_up: SignUpState::new(Role::Patient),
            consultation: None,
            profile: RemoteData::Idle,
            consultations: RemoteData::Idle,
            selected_consultation: 0,
            should_quit: false,
        }
    }
}

/// Main application structure
pub struct App {
    pub state: AppState,
    /// Theme and auth slices shared by every view
    pub session: SessionStore,
    runner: ApiTaskRunner,
}

impl App {
    /// Create the application; backend results arrive on `sender`'s channel
    pub fn new(
        api: Arc<dyn ClinicApi>,
        session: SessionStore,
        sender: mpsc::UnboundedSender<Event>,
    ) -> Self {
        Self {
            state: AppState::default(),
            session,
            runner: ApiTaskRunner::new(api, sender),
        }
    }

    /// Reconcile with the backend and show the doctor listing
    pub fn start(&mut self) {
        self.runner.check_auth();
        self.navigate(Route::Home);
    }

    pub fn palette(&self) -> Palette {
        Palette::for_theme(self.session.theme())
    }

    /// Menu entries for the current session, in F-key order
    pub fn menu(&self) -> Vec<MenuItem> {
        menu_items(self.session.state())
    }

    /// Show `requested`, or wherever the route guards send it
    pub fn navigate(&mut self, requested: Route) {
        let route = resolve_route(self.session.state(), requested.clone());
        if route != requested {
            debug!("Redirected {} to {}", requested, route);
        }
        debug!("Navigating to {}", route);

        if !matches!(route, Route::Consult(_)) {
            self.state.consultation = None;
        }
        self.state.route = route.clone();

        match route {
            Route::Home => {
                self.state.doctors = RemoteData::Loading;
                self.runner.load_doctors();
            }
            Route::SignIn(role) => self.state.sign_in = SignInState::new(role),
            Route::SignUp(role) => self.state.sign_up = SignUpState::new(role),
            Route::DoctorProfile(_) => {
                self.state.profile = RemoteData::Loading;
                self.runner.load_profile();
            }
            Route::DoctorConsultations(_) => {
                self.state.consultations = RemoteData::Loading;
                self.state.selected_consultation = 0;
                self.runner.load_consultations();
            }
            Route::Consult(doctor_id) => {
                let doctor_name = match &self.state.doctors {
                    RemoteData::Loaded(doctors) => doctors
                        .iter()
                        .find(|d| d.id == doctor_id)
                        .map(|d| d.name.clone()),
                    _ => None,
                };
                let patient_id = self.session.state().patient_id.clone();
                self.state.consultation = Some(ConsultationScreenState::new(
                    patient_id,
                    doctor_id,
                    doctor_name,
                ));
            }
        }
    }

    pub fn set_loading(&mut self, message: impl Into<String>) {
        self.state.loading_state = LoadingState::loading(message);
    }

    pub fn set_success(&mut self, message: impl Into<String>) {
        self.state.loading_state = LoadingState::success(message);
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.state.loading_state = LoadingState::error(message);
    }

    pub fn clear_messages(&mut self) {
        self.state.loading_state = LoadingState::Idle;
    }

    /// Expire old notifications; called once per loop iteration
    pub fn tick(&mut self) {
        if self.state.loading_state.is_expired(Instant::now()) {
            self.clear_messages();
        }
    }

    /// Handle one event, returning whether the app should quit
    pub fn handle_event(&mut self, event: Event) -> bool {
        if event.is_api_response() {
            self.handle_api_response(event);
            return self.state.should_quit;
        }

        match event {
            Event::Quit => self.state.should_quit = true,
            Event::F(n) if n >= 1 => self.activate_menu_item(usize::from(n - 1)),
            Event::Ctrl('t') => self.toggle_theme(),
            other => match self.state.route.clone() {
                Route::Home => self.handle_home_event(other),
                Route::SignIn(_) => self.handle_sign_in_event(other),
                Route::SignUp(_) => self.handle_sign_up_event(other),
                Route::Consult(_) => self.handle_consultation_event(other),
                Route::DoctorProfile(_) => self.handle_profile_event(other),
                Route::DoctorConsultations(_) => self.handle_consultations_event(other),
            },
        }

        self.state.should_quit
    }

    /// Run the action behind the `index`th menu entry
    pub fn activate_menu_item(&mut self, index: usize) {
        let Some(item) = self.menu().into_iter().nth(index) else {
            return;
        };
        debug!("Menu: {}", item.label);
        match item.action {
            MenuAction::Navigate(route) => self.navigate(route),
            MenuAction::Logout(role) => {
                self.set_loading(format!("Logging out {}...", role.display_name()));
                self.runner.logout(role);
            }
            MenuAction::ToggleTheme => self.toggle_theme(),
        }
    }

    fn toggle_theme(&mut self) {
        self.session.toggle_theme();
        info!("Theme switched to {}", self.session.theme());
    }

    // === Screen input ===

    fn handle_home_event(&mut self, event: Event) {
        let count = match &self.state.doctors {
            RemoteData::Loaded(doctors) => doctors.len(),
            _ => 0,
        };
        match event {
            Event::Up => {
                self.state.selected_doctor = self.state.selected_doctor.saturating_sub(1);
            }
            Event::Down if count > 0 => {
                self.state.selected_doctor = (self.state.selected_doctor + 1).min(count - 1);
            }
            Event::Enter => self.open_selected_doctor(),
            Event::Char('r') => self.navigate(Route::Home),
            _ => {}
        }
    }

    fn open_selected_doctor(&mut self) {
        let doctor_id = match &self.state.doctors {
            RemoteData::Loaded(doctors) => doctors
                .get(self.state.selected_doctor)
                .map(|d| d.id.clone()),
            _ => None,
        };
        if let Some(doctor_id) = doctor_id {
            let route = consult_route(self.session.state(), &doctor_id);
            self.navigate(route);
        }
    }

    fn handle_sign_in_event(&mut self, event: Event) {
        let form = &mut self.state.sign_in.form;
        match event {
            Event::Tab => form.focus_next(),
            Event::BackTab => form.focus_previous(),
            Event::Enter => self.submit_sign_in(),
            Event::Escape => self.navigate(Route::Home),
            other => {
                form.handle_event(&other);
            }
        }
    }

    fn submit_sign_in(&mut self) {
        let state = &mut self.state.sign_in;
        if state.submitting {
            return;
        }
        let form = state.to_form();
        let errors = form.validate();
        state.form.apply_errors(&errors);
        if !errors.is_empty() {
            return;
        }

        state.submitting = true;
        let role = state.role;
        self.runner.sign_in(role, form);
        self.set_loading("Signing in...");
    }

    fn handle_sign_up_event(&mut self, event: Event) {
        let form = &mut self.state.sign_up.form;
        if form.is_capturing() {
            form.handle_event(&event);
            return;
        }
        match event {
            Event::Tab => form.focus_next(),
            Event::BackTab => form.focus_previous(),
            Event::Enter if form.focused_is_select() => {
                form.handle_event(&event);
            }
            Event::Enter => self.submit_sign_up(),
            Event::Escape => self.navigate(Route::Home),
            other => {
                form.handle_event(&other);
            }
        }
    }

    fn submit_sign_up(&mut self) {
        let state = &mut self.state.sign_up;
        if state.submitting {
            return;
        }

        let submitted = match state.role {
            Role::Doctor => state
                .doctor_form()
                .map(|form| self.runner.sign_up_doctor(form)),
            Role::Patient => state
                .patient_form()
                .map(|form| self.runner.sign_up_patient(form)),
        };

        match submitted {
            Ok(()) => {
                state.form.clear_errors();
                state.submitting = true;
                self.set_loading("Creating account...");
            }
            Err(errors) => state.form.apply_errors(&errors),
        }
    }

    fn handle_consultation_event(&mut self, event: Event) {
        let Some(state) = self.state.consultation.as_mut() else {
            return;
        };
        if state.form.is_capturing() {
            if let Some(key) = state.form.handle_event(&event) {
                state.field_changed(key);
            }
            return;
        }

        match event {
            Event::Tab => state.form.focus_next(),
            Event::BackTab => state.form.focus_previous(),
            Event::Escape => {
                if !state.retreat() {
                    self.navigate(Route::Home);
                }
            }
            Event::Enter if state.form.focused_is_select() => {
                if let Some(key) = state.form.handle_event(&event) {
                    state.field_changed(key);
                }
            }
            Event::Enter if state.wizard.step() == WizardStep::Payment => {
                self.submit_consultation();
            }
            Event::Enter => {
                state.advance();
            }
            Event::Char('p') if state.wizard.step() == WizardStep::Payment => {
                if !state.wizard.is_submitted() && !state.wizard.is_submitting() {
                    let txn_id = state.wizard.simulate_payment().to_string();
                    self.set_success(format!("{} Transaction ID: {}", PAYMENT_SUCCESS, txn_id));
                }
            }
            other => {
                if let Some(key) = state.form.handle_event(&other) {
                    state.field_changed(key);
                }
            }
        }
    }

    fn submit_consultation(&mut self) {
        let Some(state) = self.state.consultation.as_mut() else {
            return;
        };
        match state.wizard.begin_submit() {
            Ok(request) => {
                self.runner.submit_consultation(request);
                self.set_loading("Submitting consultation...");
            }
            Err(e) => self.set_error(e.user_message()),
        }
    }

    fn handle_profile_event(&mut self, event: Event) {
        match event {
            Event::Char('r') => self.navigate(self.state.route.clone()),
            Event::Escape => self.navigate(Route::Home),
            _ => {}
        }
    }

    fn handle_consultations_event(&mut self, event: Event) {
        let count = match &self.state.consultations {
            RemoteData::Loaded(consultations) => consultations.len(),
            _ => 0,
        };
        match event {
            Event::Up => {
                self.state.selected_consultation =
                    self.state.selected_consultation.saturating_sub(1);
            }
            Event::Down if count > 0 => {
                self.state.selected_consultation =
                    (self.state.selected_consultation + 1).min(count - 1);
            }
            Event::Char('r') => self.navigate(self.state.route.clone()),
            Event::Escape => self.navigate(Route::Home),
            _ => {}
        }
    }

    // === Backend results ===

    fn handle_api_response(&mut self, event: Event) {
        match event {
            Event::DoctorsLoaded(result) => {
                self.state.doctors = match result {
                    Ok(doctors) => {
                        let last = doctors.len().saturating_sub(1);
                        self.state.selected_doctor = self.state.selected_doctor.min(last);
                        RemoteData::Loaded(doctors)
                    }
                    Err(e) => RemoteData::Failed(e),
                };
            }
            Event::AuthChecked(result) => {
                let outcome = apply_reconciliation(&mut self.session, result);
                if let Some(message) = outcome.notification() {
                    self.set_error(message);
                }
                // Roles may have changed under the current route
                let current = self.state.route.clone();
                if resolve_route(self.session.state(), current.clone()) != current {
                    self.navigate(current);
                }
            }
            Event::SignedIn { role, result } => {
                self.state.sign_in.submitting = false;
                match result {
                    Ok(id) => self.finish_sign_in(role, id, SIGN_IN_SUCCESS),
                    Err(failure) => {
                        if self.state.route == Route::SignIn(role) {
                            if let Some(errors) = failure.field_errors() {
                                self.state.sign_in.form.apply_errors(errors);
                            }
                        }
                        self.set_error(failure.user_message());
                    }
                }
            }
            Event::SignedUp { role, result } => {
                self.state.sign_up.submitting = false;
                match result {
                    Ok(id) => self.finish_sign_in(role, id, SIGN_UP_SUCCESS),
                    Err(failure) => {
                        if self.state.route == Route::SignUp(role) {
                            if let Some(errors) = failure.field_errors() {
                                self.state.sign_up.form.apply_errors(errors);
                            }
                        }
                        self.set_error(failure.user_message());
                    }
                }
            }
            Event::LoggedOut { role, result } => match result {
                Ok(()) => {
                    record_logout(&mut self.session, role);
                    self.set_success(LOGOUT_SUCCESS);
                    self.navigate(Route::Home);
                    self.runner.check_auth();
                }
                Err(failure) => self.set_error(failure.user_message()),
            },
            Event::ProfileLoaded(result) => {
                self.state.profile = match result {
                    Ok(profile) => RemoteData::Loaded(profile),
                    Err(e) => RemoteData::Failed(e),
                };
            }
            Event::ConsultationsLoaded(result) => {
                self.state.consultations = match result {
                    Ok(consultations) => RemoteData::Loaded(consultations),
                    Err(e) => RemoteData::Failed(e),
                };
            }
            Event::ConsultationSubmitted {
                payment_txn_id,
                result,
            } => {
                let owner = self.state.consultation.as_mut().filter(|state| {
                    state.wizard.is_submitting()
                        && state.wizard.payment_transaction_id() == Some(payment_txn_id.as_str())
                });
                let Some(state) = owner else {
                    debug!(
                        "Result for consultation {} arrived after leaving its form",
                        payment_txn_id
                    );
                    match result {
                        Ok(()) => self.set_success(SUBMIT_SUCCESS),
                        Err(detail) => self.set_error(SubmitError::Failed(detail).user_message()),
                    }
                    return;
                };
                match state.wizard.complete_submit(result) {
                    Ok(()) => {
                        self.set_success(SUBMIT_SUCCESS);
                        self.navigate(Route::Home);
                    }
                    Err(e) => self.set_error(e.user_message()),
                }
            }
            _ => {}
        }
    }

    fn finish_sign_in(&mut self, role: Role, id: String, message: &str) {
        record_sign_in(&mut self.session, role, id);
        self.set_success(message);
        self.navigate(Route::Home);
        self.runner.check_auth();
    }
}

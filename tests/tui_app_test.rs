#![cfg(feature = "tui")]

mod utils;

use std::sync::Arc;
use std::time::Duration;

use clinic_booking_sdk::auth::{LOGOUT_SUCCESS, SIGN_IN_SUCCESS};
use clinic_booking_sdk::client::ClinicApi;
use clinic_booking_sdk::consultation::{PAYMENT_REQUIRED, SUBMIT_SUCCESS};
use clinic_booking_sdk::models::{AuthCheck, Role};
use clinic_booking_sdk::tui::app::{App, RemoteData};
use clinic_booking_sdk::tui::render_ui;
use clinic_booking_sdk::tui::Event;
use clinic_booking_sdk::{Route, SessionStore, Theme, WizardStep};
use ratatui::{backend::TestBackend, Terminal};
use tokio::sync::mpsc;
use utils::test_utils::{Call, Endpoint, MockClinicApi, MockFailure};

struct Harness {
    app: App,
    events: mpsc::UnboundedReceiver<Event>,
    api: Arc<MockClinicApi>,
}

impl Harness {
    fn new(api: MockClinicApi) -> Self {
        let api = Arc::new(api);
        let (sender, events) = mpsc::unbounded_channel();
        let shared: Arc<dyn ClinicApi> = api.clone();
        let app = App::new(shared, SessionStore::in_memory(), sender);
        Self { app, events, api }
    }

    /// Start the app and apply the startup auth check and doctor listing
    async fn started(api: MockClinicApi) -> Self {
        let mut harness = Self::new(api);
        harness.app.start();
        harness.pump(2).await;
        harness
    }

    /// Feed `count` backend results into the app
    async fn pump(&mut self, count: usize) {
        for _ in 0..count {
            let event = tokio::time::timeout(Duration::from_secs(2), self.events.recv())
                .await
                .expect("timed out waiting for a backend result")
                .expect("event channel closed");
            self.app.handle_event(event);
        }
    }

    fn press(&mut self, event: Event) {
        self.app.handle_event(event);
    }

    fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(Event::Char(c));
        }
    }

    fn notice(&self) -> Option<&str> {
        self.app.state.loading_state.message()
    }
}

#[tokio::test]
async fn test_startup_reconciles_and_lists_doctors() {
    let harness = Harness::started(MockClinicApi::new()).await;

    assert_eq!(harness.app.state.route, Route::Home);
    match &harness.app.state.doctors {
        RemoteData::Loaded(doctors) => assert_eq!(doctors.len(), 2),
        other => panic!("doctors not loaded: {:?}", other),
    }
    assert_eq!(harness.api.count(Endpoint::CheckAuth), 1);
    assert!(!harness.app.session.state().patient_authenticated);
}

#[tokio::test]
async fn test_consult_without_patient_goes_to_sign_in() {
    let mut harness = Harness::started(MockClinicApi::new()).await;

    harness.press(Event::Enter);

    assert_eq!(harness.app.state.route, Route::SignIn(Role::Patient));
    assert!(harness.app.state.consultation.is_none());
}

#[tokio::test]
async fn test_patient_sign_in_flow() {
    let mut harness =
        Harness::started(MockClinicApi::new().with_auth_check(AuthCheck::unauthenticated())).await;
    harness.app.navigate(Route::SignIn(Role::Patient));

    harness.type_text("ana@clinic.test");
    harness.press(Event::Tab);
    harness.type_text("secret123");
    // The backend now recognises the cookie
    harness.api.set_auth_check(AuthCheck::patient("p1"));
    harness.press(Event::Enter);
    assert!(harness.app.state.sign_in.submitting);

    // SignedIn, then the home listing and the follow-up auth check
    harness.pump(3).await;

    let session = harness.app.session.state();
    assert!(session.patient_authenticated);
    assert_eq!(session.patient_id, "p1");
    assert_eq!(harness.app.state.route, Route::Home);
    assert_eq!(harness.notice(), Some(SIGN_IN_SUCCESS));
}

#[tokio::test]
async fn test_invalid_sign_in_form_is_not_sent() {
    let mut harness = Harness::started(MockClinicApi::new()).await;
    harness.app.navigate(Route::SignIn(Role::Doctor));

    harness.type_text("not-an-email");
    harness.press(Event::Enter);

    assert!(!harness.app.state.sign_in.submitting);
    assert!(harness.app.state.sign_in.form.error("email").is_some());
    assert!(harness.app.state.sign_in.form.error("password").is_some());
    assert_eq!(harness.api.count(Endpoint::SignIn), 0);
}

#[tokio::test]
async fn test_unknown_email_is_reported() {
    let mut harness = Harness::started(MockClinicApi::new()).await;
    harness
        .api
        .fail(Endpoint::SignIn, MockFailure::flag(404, "PatientNotFound"));
    harness.app.navigate(Route::SignIn(Role::Patient));

    harness.type_text("ghost@clinic.test");
    harness.press(Event::Tab);
    harness.type_text("secret123");
    harness.press(Event::Enter);
    harness.pump(1).await;

    assert!(harness.app.state.loading_state.is_error());
    assert_eq!(harness.notice(), Some("Email not found"));
    assert_eq!(harness.app.state.route, Route::SignIn(Role::Patient));
    assert!(!harness.app.state.sign_in.submitting);
    assert!(!harness.app.session.state().patient_authenticated);
}

#[tokio::test]
async fn test_consultation_wizard_submits_after_payment() {
    let mut harness =
        Harness::started(MockClinicApi::new().with_auth_check(AuthCheck::patient("p1"))).await;
    assert!(harness.app.session.state().patient_authenticated);

    harness.press(Event::Enter);
    assert_eq!(harness.app.state.route, Route::Consult("d1".to_string()));
    let doctor_name = harness
        .app
        .state
        .consultation
        .as_ref()
        .and_then(|c| c.doctor_name.clone());
    assert_eq!(doctor_name.as_deref(), Some("Dr. Meredith Grey"));

    // Step 1
    harness.type_text("Migraine");
    harness.press(Event::Tab);
    harness.type_text("None");
    harness.press(Event::Enter);

    // Step 2: skip the dropdown, keep the default status
    harness.press(Event::Tab);
    harness.type_text("Penicillin");
    harness.press(Event::Enter);

    let step = harness
        .app
        .state
        .consultation
        .as_ref()
        .map(|c| c.wizard.step());
    assert_eq!(step, Some(WizardStep::Payment));

    // Unpaid submission is refused locally
    harness.press(Event::Enter);
    assert_eq!(harness.notice(), Some(PAYMENT_REQUIRED));
    assert_eq!(harness.api.count(Endpoint::CreateConsultation), 0);

    harness.press(Event::Char('p'));
    harness.press(Event::Enter);
    // Submission result, then the home listing
    harness.pump(2).await;

    assert_eq!(harness.notice(), Some(SUBMIT_SUCCESS));
    assert_eq!(harness.app.state.route, Route::Home);
    assert!(harness.app.state.consultation.is_none());

    let submitted = harness.api.calls().into_iter().find_map(|call| match call {
        Call::CreateConsultation(doctor_id, request) => Some((doctor_id, request)),
        _ => None,
    });
    let (doctor_id, request) = submitted.expect("consultation was not sent");
    assert_eq!(doctor_id, "d1");
    assert_eq!(request.patient_id, "p1");
    assert_eq!(request.step1_illness, "Migraine");
    assert_eq!(request.allergies, "Penicillin");
    assert!(request.payment_txn_id.starts_with("TXN_"));
}

#[tokio::test]
async fn test_failed_submission_keeps_draft() {
    let mut harness =
        Harness::started(MockClinicApi::new().with_auth_check(AuthCheck::patient("p1"))).await;
    harness.api.fail(
        Endpoint::CreateConsultation,
        MockFailure::Network("connection reset".to_string()),
    );

    harness.press(Event::Enter);
    harness.type_text("Migraine");
    harness.press(Event::Tab);
    harness.type_text("None");
    harness.press(Event::Enter);
    harness.press(Event::Tab);
    harness.press(Event::Enter);
    harness.press(Event::Char('p'));
    harness.press(Event::Enter);
    harness.pump(1).await;

    assert!(harness.app.state.loading_state.is_error());
    assert_eq!(harness.app.state.route, Route::Consult("d1".to_string()));
    let state = harness.app.state.consultation.as_ref().unwrap();
    assert!(!state.wizard.is_submitted());
    assert!(!state.wizard.is_submitting());
    assert_eq!(state.wizard.draft().illness_history, "Migraine");
}

/// Pay for and submit a consultation with the first doctor, returning the
/// result event without applying it
async fn submit_first_doctor_and_hold(harness: &mut Harness) -> Event {
    harness.press(Event::Enter);
    harness.type_text("Migraine");
    harness.press(Event::Tab);
    harness.type_text("None");
    harness.press(Event::Enter);
    harness.press(Event::Tab);
    harness.press(Event::Enter);
    harness.press(Event::Char('p'));
    harness.press(Event::Enter);

    tokio::time::timeout(Duration::from_secs(2), harness.events.recv())
        .await
        .expect("timed out waiting for the submission result")
        .expect("event channel closed")
}

/// Leave the form for home, then open the second doctor's form
async fn open_second_doctor(harness: &mut Harness) {
    // Back through each step, then home
    for _ in 0..3 {
        harness.press(Event::Escape);
    }
    assert_eq!(harness.app.state.route, Route::Home);
    harness.pump(1).await;

    harness.press(Event::Down);
    harness.press(Event::Enter);
    assert_eq!(harness.app.state.route, Route::Consult("d2".to_string()));
}

#[tokio::test]
async fn test_late_submission_result_leaves_other_form_alone() {
    let mut harness =
        Harness::started(MockClinicApi::new().with_auth_check(AuthCheck::patient("p1"))).await;

    let held = submit_first_doctor_and_hold(&mut harness).await;
    assert!(matches!(held, Event::ConsultationSubmitted { .. }));
    open_second_doctor(&mut harness).await;

    harness.app.handle_event(held);

    assert_eq!(harness.app.state.route, Route::Consult("d2".to_string()));
    let state = harness.app.state.consultation.as_ref().unwrap();
    assert_eq!(state.wizard.draft().doctor_id, "d2");
    assert!(!state.wizard.is_submitted());
    assert!(!state.wizard.is_submitting());
    assert_eq!(state.wizard.step(), WizardStep::MedicalHistory);
    assert_eq!(harness.notice(), Some(SUBMIT_SUCCESS));

    let sent_for: Vec<String> = harness
        .api
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::CreateConsultation(doctor_id, _) => Some(doctor_id),
            _ => None,
        })
        .collect();
    assert_eq!(sent_for, vec!["d1".to_string()]);
}

#[tokio::test]
async fn test_late_submission_failure_leaves_other_form_alone() {
    let mut harness =
        Harness::started(MockClinicApi::new().with_auth_check(AuthCheck::patient("p1"))).await;
    harness.api.fail(
        Endpoint::CreateConsultation,
        MockFailure::Network("connection reset".to_string()),
    );

    let held = submit_first_doctor_and_hold(&mut harness).await;
    open_second_doctor(&mut harness).await;

    harness.app.handle_event(held);

    assert!(harness.app.state.loading_state.is_error());
    assert_eq!(harness.app.state.route, Route::Consult("d2".to_string()));
    let state = harness.app.state.consultation.as_ref().unwrap();
    assert!(!state.wizard.is_submitting());
    assert!(state.wizard.errors().is_empty());
    assert_eq!(harness.api.count(Endpoint::CreateConsultation), 1);
}

#[tokio::test]
async fn test_doctor_menu_profile_and_logout() {
    let mut harness =
        Harness::started(MockClinicApi::new().with_auth_check(AuthCheck::doctor("d1"))).await;
    let labels: Vec<String> = harness.app.menu().into_iter().map(|i| i.label).collect();
    assert_eq!(labels[1], "Profile");
    assert_eq!(labels[3], "Doctor Logout");

    harness.press(Event::F(2));
    assert_eq!(harness.app.state.route, Route::DoctorProfile("d1".to_string()));
    harness.pump(1).await;
    match &harness.app.state.profile {
        RemoteData::Loaded(profile) => assert_eq!(profile.name, "Dr. Meredith Grey"),
        other => panic!("profile not loaded: {:?}", other),
    }

    harness.api.set_auth_check(AuthCheck::unauthenticated());
    harness.press(Event::F(4));
    assert!(harness.app.state.loading_state.is_loading());
    // LoggedOut, then the home listing and the follow-up auth check
    harness.pump(3).await;

    assert!(!harness.app.session.state().doctor_authenticated);
    assert_eq!(harness.app.state.route, Route::Home);
    assert_eq!(harness.notice(), Some(LOGOUT_SUCCESS));
    assert_eq!(harness.api.count(Endpoint::Logout), 1);
}

#[tokio::test]
async fn test_reconciliation_redirects_guarded_route() {
    let mut harness =
        Harness::started(MockClinicApi::new().with_auth_check(AuthCheck::patient("p1"))).await;
    harness.press(Event::Enter);
    assert_eq!(harness.app.state.route, Route::Consult("d1".to_string()));

    // Patient session expired on the backend
    harness
        .app
        .handle_event(Event::AuthChecked(Ok(AuthCheck::unauthenticated())));

    assert_eq!(harness.app.state.route, Route::SignIn(Role::Patient));
    assert!(harness.app.state.consultation.is_none());
}

#[tokio::test]
async fn test_failed_auth_check_keeps_session() {
    let mut harness =
        Harness::started(MockClinicApi::new().with_auth_check(AuthCheck::doctor("d1"))).await;

    harness
        .app
        .handle_event(Event::AuthChecked(Err("connection refused".to_string())));

    assert!(harness.app.session.state().doctor_authenticated);
    assert!(harness.app.state.loading_state.is_error());
}

#[tokio::test]
async fn test_renders_home_and_toggles_theme() {
    let mut harness = Harness::started(MockClinicApi::new()).await;
    let mut terminal = Terminal::new(TestBackend::new(120, 32)).unwrap();

    terminal
        .draw(|frame| render_ui(frame, &mut harness.app).unwrap())
        .unwrap();
    let screen: String = terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect();
    assert!(screen.contains("Clinic Booking"));
    assert!(screen.contains("Dr. Meredith Grey"));
    assert!(screen.contains("F1:Home"));

    let before = harness.app.session.theme();
    harness.press(Event::Ctrl('t'));
    assert_ne!(harness.app.session.theme(), before);
    assert!(matches!(
        harness.app.session.theme(),
        Theme::Light | Theme::Dark
    ));
}

#[tokio::test]
async fn test_quit() {
    let mut harness = Harness::new(MockClinicApi::new());
    assert!(harness.app.handle_event(Event::Quit));
    assert!(harness.app.state.should_quit);
}

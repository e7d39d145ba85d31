//! Event Handling System
//!
//! This module turns terminal input into application events and runs
//! backend requests off the UI loop, reporting their results back through
//! the same channel.

use crossterm::event::{self, KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use crate::auth::{
    submit_doctor_sign_up, submit_logout, submit_patient_sign_up, submit_sign_in, AuthFailure,
    DoctorSignUpForm, PatientSignUpForm, SignInForm,
};
use crate::client::ClinicApi;
use crate::models::{AuthCheck, Consultation, ConsultationRequest, DoctorProfile, DoctorSummary};
use crate::Role;

/// Application events that can be handled
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Quit the application (Ctrl+C / Ctrl+Q)
    Quit,
    /// Move focus forward
    Tab,
    /// Move focus backward (Shift+Tab)
    BackTab,
    /// Enter/confirm action
    Enter,
    /// Escape/back action
    Escape,
    /// Arrow key navigation
    Up,
    Down,
    Left,
    Right,
    /// Character input
    Char(char),
    /// Backspace key
    Backspace,
    /// Delete key
    Delete,
    /// Home key
    Home,
    /// End key
    End,
    /// Function keys, used for the menu
    F(u8),
    /// Ctrl+key combinations
    Ctrl(char),

    // === Backend results ===
    /// `GET /api/doctor/` answered
    DoctorsLoaded(Result<Vec<DoctorSummary>, String>),
    /// `GET /api/auth/checkAuth` answered
    AuthChecked(Result<AuthCheck, String>),
    /// Sign-in finished, carrying the account id on success
    SignedIn {
        role: Role,
        result: Result<String, AuthFailure>,
    },
    /// Sign-up finished, carrying the new account id on success
    SignedUp {
        role: Role,
        result: Result<String, AuthFailure>,
    },
    /// Logout finished
    LoggedOut {
        role: Role,
        result: Result<(), AuthFailure>,
    },
    /// Signed-in doctor's profile arrived
    ProfileLoaded(Result<DoctorProfile, String>),
    /// Signed-in doctor's consultations arrived
    ConsultationsLoaded(Result<Vec<Consultation>, String>),
    /// Consultation submission finished, tagged with the payment it carried
    ConsultationSubmitted {
        payment_txn_id: String,
        result: Result<(), String>,
    },
}

impl Event {
    /// Whether this event carries a backend result
    pub fn is_api_response(&self) -> bool {
        matches!(
            self,
            Event::DoctorsLoaded(_)
                | Event::AuthChecked(_)
                | Event::SignedIn { .. }
                | Event::SignedUp { .. }
                | Event::LoggedOut { .. }
                | Event::ProfileLoaded(_)
                | Event::ConsultationsLoaded(_)
                | Event::ConsultationSubmitted { .. }
        )
    }
}

/// Event handler for processing terminal events
pub struct EventHandler {
    /// Receiver for events
    receiver: mpsc::UnboundedReceiver<Event>,
    /// Sender for events (shared with background requests)
    sender: mpsc::UnboundedSender<Event>,
    /// Handle for the background terminal event processing task
    _terminal_task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        let event_sender = sender.clone();
        let terminal_task = tokio::spawn(async move {
            loop {
                // Poll with a timeout so the task never blocks the runtime for long
                if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                    if let Ok(terminal_event) = event::read() {
                        if let Some(app_event) = Self::convert_terminal_event(terminal_event) {
                            if event_sender.send(app_event).is_err() {
                                break;
                            }
                        }
                    }
                }

                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        });

        Self {
            receiver,
            sender,
            _terminal_task: terminal_task,
        }
    }

    /// Get the next event
    pub async fn next(&mut self) -> Result<Event, Box<dyn std::error::Error + Send + Sync>> {
        self.receiver
            .recv()
            .await
            .ok_or_else(|| "Event channel closed".into())
    }

    /// Sender that background requests report through
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }

    fn convert_terminal_event(terminal_event: event::Event) -> Option<Event> {
        match terminal_event {
            event::Event::Key(key_event) if key_event.kind == event::KeyEventKind::Press => {
                Self::convert_key_event(key_event)
            }
            _ => None,
        }
    }

    /// Convert a key event to an application event
    ///
    /// Plain letters are always text input, so quitting needs Ctrl.
    fn convert_key_event(key_event: KeyEvent) -> Option<Event> {
        match key_event {
            KeyEvent {
                code: KeyCode::Char('c') | KeyCode::Char('q'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => Some(Event::Quit),

            KeyEvent {
                code: KeyCode::Tab,
                modifiers: KeyModifiers::NONE,
                ..
            } => Some(Event::Tab),

            // Terminals disagree on whether BackTab carries SHIFT
            KeyEvent {
                code: KeyCode::BackTab,
                ..
            } => Some(Event::BackTab),

            KeyEvent {
                code: KeyCode::Enter,
                ..
            } => Some(Event::Enter),

            KeyEvent {
                code: KeyCode::Esc, ..
            } => Some(Event::Escape),

            KeyEvent {
                code: KeyCode::Up, ..
            } => Some(Event::Up),
            KeyEvent {
                code: KeyCode::Down,
                ..
            } => Some(Event::Down),
            KeyEvent {
                code: KeyCode::Left,
                ..
            } => Some(Event::Left),
            KeyEvent {
                code: KeyCode::Right,
                ..
            } => Some(Event::Right),

            KeyEvent {
                code: KeyCode::Backspace,
                ..
            } => Some(Event::Backspace),
            KeyEvent {
                code: KeyCode::Delete,
                ..
            } => Some(Event::Delete),
            KeyEvent {
                code: KeyCode::Home,
                ..
            } => Some(Event::Home),
            KeyEvent {
                code: KeyCode::End, ..
            } => Some(Event::End),

            KeyEvent {
                code: KeyCode::F(n),
                ..
            } => Some(Event::F(n)),

            KeyEvent {
                code: KeyCode::Char(c),
                modifiers,
                ..
            } if modifiers == KeyModifiers::NONE || modifiers == KeyModifiers::SHIFT => {
                Some(Event::Char(c))
            }

            KeyEvent {
                code: KeyCode::Char(c),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => Some(Event::Ctrl(c)),

            _ => None,
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs backend requests on the tokio runtime
///
/// Every request spawns its own task and reports exactly one result event.
#[derive(Clone)]
pub struct ApiTaskRunner {
    api: Arc<dyn ClinicApi>,
    sender: mpsc::UnboundedSender<Event>,
}

impl ApiTaskRunner {
    pub fn new(api: Arc<dyn ClinicApi>, sender: mpsc::UnboundedSender<Event>) -> Self {
        Self { api, sender }
    }

    fn spawn<F, Fut>(&self, name: &'static str, request: F)
    where
        F: FnOnce(Arc<dyn ClinicApi>) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Event> + Send + 'static,
    {
        let api = Arc::clone(&self.api);
        let sender = self.sender.clone();
        debug!("Dispatching {}", name);
        tokio::spawn(async move {
            let event = request(api).await;
            if sender.send(event).is_err() {
                debug!("{} finished after the UI closed", name);
            }
        });
    }

    pub fn load_doctors(&self) {
        self.spawn("list_doctors", |api| async move {
            Event::DoctorsLoaded(api.list_doctors().await.map_err(|e| e.to_string()))
        });
    }

    pub fn check_auth(&self) {
        self.spawn("check_auth", |api| async move {
            Event::AuthChecked(api.check_auth().await.map_err(|e| e.to_string()))
        });
    }

    pub fn sign_in(&self, role: Role, form: SignInForm) {
        self.spawn("sign_in", move |api| async move {
            let result = submit_sign_in(api.as_ref(), role, &form).await;
            Event::SignedIn { role, result }
        });
    }

    pub fn sign_up_doctor(&self, form: DoctorSignUpForm) {
        self.spawn("doctor_sign_up", move |api| async move {
            let result = submit_doctor_sign_up(api.as_ref(), &form).await;
            Event::SignedUp {
                role: Role::Doctor,
                result,
            }
        });
    }

    pub fn sign_up_patient(&self, form: PatientSignUpForm) {
        self.spawn("patient_sign_up", move |api| async move {
            let result = submit_patient_sign_up(api.as_ref(), &form).await;
            Event::SignedUp {
                role: Role::Patient,
                result,
            }
        });
    }

    pub fn logout(&self, role: Role) {
        self.spawn("logout", move |api| async move {
            let result = submit_logout(api.as_ref(), role).await;
            Event::LoggedOut { role, result }
        });
    }

    pub fn load_profile(&self) {
        self.spawn("doctor_profile", |api| async move {
            Event::ProfileLoaded(api.doctor_profile().await.map_err(|e| e.to_string()))
        });
    }

    pub fn load_consultations(&self) {
        self.spawn("doctor_consultations", |api| async move {
            Event::ConsultationsLoaded(
                api.doctor_consultations()
                    .await
                    .map_err(|e| e.to_string()),
            )
        });
    }

    pub fn submit_consultation(&self, request: ConsultationRequest) {
        self.spawn("create_consultation", move |api| async move {
            let result = api
                .create_consultation(&request.doctor_id, &request)
                .await
                .map_err(|e| e.to_string());
            Event::ConsultationSubmitted {
                payment_txn_id: request.payment_txn_id,
                result,
            }
        });
    }
}

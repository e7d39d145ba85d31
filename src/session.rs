//! Client-held session state
//!
//! [`SessionStore`] owns the theme and the two independent auth slices
//! (doctor and patient). Views get it by reference and change it only
//! through the mutation methods or a [`SessionCommand`].

pub mod storage;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use crate::models::{AuthCheck, Role, SessionRole};

pub use storage::{FileThemeStore, MemoryThemeStore, ThemeStore};

/// UI colour scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

/// Snapshot of the session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    pub theme: Theme,
    pub doctor_authenticated: bool,
    pub doctor_id: String,
    pub patient_authenticated: bool,
    pub patient_id: String,
}

impl SessionState {
    /// Whether the given role is signed in
    pub fn is_authenticated(&self, role: Role) -> bool {
        match role {
            Role::Doctor => self.doctor_authenticated,
            Role::Patient => self.patient_authenticated,
        }
    }

    /// Identity held for the role, `None` when signed out or empty
    pub fn identity(&self, role: Role) -> Option<&str> {
        let (authenticated, id) = match role {
            Role::Doctor => (self.doctor_authenticated, &self.doctor_id),
            Role::Patient => (self.patient_authenticated, &self.patient_id),
        };
        if authenticated && !id.is_empty() {
            Some(id.as_str())
        } else {
            None
        }
    }
}

/// A single session mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    SetTheme(Theme),
    ToggleTheme,
    SetDoctorAuth { authenticated: bool, id: String },
    SetPatientAuth { authenticated: bool, id: String },
}

impl SessionCommand {
    /// Command that records a successful sign-in for `role`
    pub fn signed_in(role: Role, id: impl Into<String>) -> Self {
        Self::auth(role, true, id.into())
    }

    /// Command that clears `role`
    pub fn signed_out(role: Role) -> Self {
        Self::auth(role, false, String::new())
    }

    fn auth(role: Role, authenticated: bool, id: String) -> Self {
        match role {
            Role::Doctor => SessionCommand::SetDoctorAuth { authenticated, id },
            Role::Patient => SessionCommand::SetPatientAuth { authenticated, id },
        }
    }
}

/// Owner of the session state
pub struct SessionStore {
    state: SessionState,
    theme_store: Arc<dyn ThemeStore>,
}

impl SessionStore {
    /// Build a store, reading the persisted theme (falls back to light)
    pub fn new(theme_store: Arc<dyn ThemeStore>) -> Self {
        let theme = match theme_store.load() {
            Ok(theme) => theme.unwrap_or_default(),
            Err(e) => {
                warn!("Failed to load theme preference: {}", e);
                Theme::default()
            }
        };

        Self {
            state: SessionState {
                theme,
                ..SessionState::default()
            },
            theme_store,
        }
    }

    /// Store backed by memory only
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryThemeStore::new()))
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn theme(&self) -> Theme {
        self.state.theme
    }

    /// Set and persist the theme
    ///
    /// A failed write is logged; the in-memory theme still changes.
    pub fn set_theme(&mut self, theme: Theme) {
        self.state.theme = theme;
        if let Err(e) = self.theme_store.save(theme) {
            warn!("Failed to persist theme '{}': {}", theme, e);
        }
    }

    pub fn toggle_theme(&mut self) {
        self.set_theme(self.state.theme.toggled());
    }

    pub fn set_doctor_auth(&mut self, authenticated: bool, id: impl Into<String>) {
        self.state.doctor_authenticated = authenticated;
        self.state.doctor_id = id.into();
        info!(
            "Doctor auth set to {} (id: '{}')",
            authenticated, self.state.doctor_id
        );
    }

    pub fn set_patient_auth(&mut self, authenticated: bool, id: impl Into<String>) {
        self.state.patient_authenticated = authenticated;
        self.state.patient_id = id.into();
        info!(
            "Patient auth set to {} (id: '{}')",
            authenticated, self.state.patient_id
        );
    }

    /// Apply one command
    pub fn dispatch(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::SetTheme(theme) => self.set_theme(theme),
            SessionCommand::ToggleTheme => self.toggle_theme(),
            SessionCommand::SetDoctorAuth { authenticated, id } => {
                self.set_doctor_auth(authenticated, id)
            }
            SessionCommand::SetPatientAuth { authenticated, id } => {
                self.set_patient_auth(authenticated, id)
            }
        }
    }

    /// Overwrite both auth slices from a backend auth check
    ///
    /// Returns `false` and leaves the store untouched when the backend says
    /// it is authenticated but names no role.
    pub fn apply_auth_check(&mut self, check: &AuthCheck) -> bool {
        if !check.authenticated {
            self.set_doctor_auth(false, "");
            self.set_patient_auth(false, "");
            return true;
        }

        let doctor_id = check.doctor_id.clone().unwrap_or_default();
        let patient_id = check.patient_id.clone().unwrap_or_default();

        match check.role {
            Some(SessionRole::Doctor) => {
                self.set_doctor_auth(true, doctor_id);
                self.set_patient_auth(false, "");
            }
            Some(SessionRole::Patient) => {
                self.set_doctor_auth(false, "");
                self.set_patient_auth(true, patient_id);
            }
            Some(SessionRole::Both) => {
                self.set_doctor_auth(true, doctor_id);
                self.set_patient_auth(true, patient_id);
            }
            None => {
                warn!("Auth check reported authenticated without a role, keeping session");
                return false;
            }
        }
        true
    }
}

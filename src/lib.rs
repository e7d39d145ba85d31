pub mod auth;
pub mod client;
pub mod config;
pub mod consultation;
pub mod error;
pub mod models;
pub mod routes;
pub mod session;
pub mod shell;
pub mod validation;

// TUI module - optional via "tui" feature
#[cfg(feature = "tui")]
pub mod tui;

pub use client::{ClinicApi, ClinicClient};
pub use config::ClinicConfig;
pub use consultation::{ConsultationDraft, ConsultationWizard, DraftField, WizardStep};
pub use error::Error;
pub use models::{AuthCheck, DiabetesStatus, Role, SessionRole};
pub use routes::Route;
pub use session::{SessionCommand, SessionState, SessionStore, Theme};
pub use validation::FieldErrors;

// Re-export TUI entry point when feature is enabled
#[cfg(feature = "tui")]
pub use tui::run_tui;

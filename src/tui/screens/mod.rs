//! Screen Implementations
//!
//! This module contains full-screen implementations for the routes of the
//! TUI application: the doctor listing, the auth forms, the consultation
//! wizard and the doctor's own pages.

pub mod consultation;
pub mod doctor_consultations;
pub mod doctor_profile;
pub mod home;
pub mod sign_in;
pub mod sign_up;

pub use consultation::*;
pub use doctor_consultations::*;
pub use doctor_profile::*;
pub use home::*;
pub use sign_in::*;
pub use sign_up::*;

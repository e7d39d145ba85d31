//! Reusable UI Components
//!
//! This module contains reusable UI components that can be used across
//! different screens in the TUI application.

// Layout components
pub mod header;
pub mod navigation;
pub mod status_bar;

pub use header::*;
pub use navigation::*;
pub use status_bar::*;

// Input components
pub mod forms;

pub use forms::*;

//! TUI Utility Modules
//!
//! This module contains helpers shared by the TUI components and screens.

pub mod formatting;
pub mod logger;
pub mod theme;

pub use formatting::*;
pub use logger::*;
pub use theme::Palette;

//! Text Formatting Utilities for TUI
//!
//! Helpers for fitting backend values into table cells and detail panes.

use chrono::{DateTime, Utc};

/// Shorten text to `max` characters, ending with an ellipsis when cut
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let kept: String = text.chars().take(max - 3).collect();
    format!("{}...", kept)
}

/// Years of experience as shown on doctor cards
pub fn format_experience(years: u32) -> String {
    match years {
        1 => "1 year".to_string(),
        n => format!("{} years", n),
    }
}

/// Creation time of a consultation, or a dash when the backend sent none
pub fn format_timestamp(timestamp: Option<&DateTime<Utc>>) -> String {
    timestamp
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Placeholder for optional free-text answers
pub fn or_none(text: &str) -> &str {
    if text.trim().is_empty() {
        "None"
    } else {
        text
    }
}

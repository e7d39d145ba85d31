//! File logging for the TUI
//!
//! The terminal belongs to the UI while it runs, so tracing output goes to
//! `~/.clinic-booking/tui.log` instead of stderr.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::Error;

/// Environment variable that overrides the log filter
pub const LOG_FILTER_ENV: &str = "CLINIC_LOG";

/// Default log file location
pub fn default_log_path() -> PathBuf {
    let mut log_path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    log_path.push(".clinic-booking");
    log_path.push("tui.log");
    log_path
}

/// Filter from `CLINIC_LOG`, falling back to `default_level`
pub fn log_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install a global subscriber appending to `path`
///
/// Fails if the file cannot be opened or a subscriber is already set.
pub fn init_logger(path: &Path, default_level: &str) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(log_filter(default_level))
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .map_err(|e| Error::Other(format!("Failed to install logger: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_path() {
        let path = default_log_path();
        assert!(path.ends_with(".clinic-booking/tui.log"));
    }

    #[test]
    fn test_log_filter_falls_back() {
        std::env::remove_var(LOG_FILTER_ENV);
        assert_eq!(log_filter("debug").to_string(), "debug");
    }
}

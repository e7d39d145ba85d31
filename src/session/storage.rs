use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::Theme;
use crate::error::Error;

/// Durable storage for the theme preference
///
/// Only the theme survives a restart; auth state is re-learned from the
/// backend through reconciliation.
pub trait ThemeStore: Send + Sync {
    /// Stored theme, `None` when nothing has been saved yet
    fn load(&self) -> Result<Option<Theme>, Error>;

    /// Persist the theme
    fn save(&self, theme: Theme) -> Result<(), Error>;
}

/// On-disk shape of the preferences file
#[derive(Debug, Default, Serialize, Deserialize)]
struct Preferences {
    #[serde(default)]
    theme: Option<Theme>,
}

/// TOML file backed theme storage
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Result<Option<Theme>, Error> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let prefs: Preferences = toml::from_str(&content)
            .map_err(|e| Error::Storage(format!("Failed to parse preferences: {}", e)))?;
        Ok(prefs.theme)
    }

    fn save(&self, theme: Theme) -> Result<(), Error> {
        let prefs = Preferences { theme: Some(theme) };
        let content = toml::to_string_pretty(&prefs)
            .map_err(|e| Error::Storage(format!("Failed to serialize preferences: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// In-memory theme storage
#[derive(Default)]
pub struct MemoryThemeStore {
    theme: Mutex<Option<Theme>>,
    fail_writes: bool,
}

impl MemoryThemeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a theme already stored
    pub fn with_theme(theme: Theme) -> Self {
        Self {
            theme: Mutex::new(Some(theme)),
            fail_writes: false,
        }
    }

    /// A store whose writes always fail
    pub fn failing() -> Self {
        Self {
            theme: Mutex::new(None),
            fail_writes: true,
        }
    }

    /// Last successfully saved theme
    pub fn stored(&self) -> Option<Theme> {
        self.theme.lock().ok().and_then(|guard| *guard)
    }
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> Result<Option<Theme>, Error> {
        self.theme
            .lock()
            .map(|guard| *guard)
            .map_err(|_| Error::Storage("theme store lock poisoned".to_string()))
    }

    fn save(&self, theme: Theme) -> Result<(), Error> {
        if self.fail_writes {
            return Err(Error::Storage("theme store is read-only".to_string()));
        }
        let mut guard = self
            .theme
            .lock()
            .map_err(|_| Error::Storage("theme store lock poisoned".to_string()))?;
        *guard = Some(theme);
        Ok(())
    }
}

use config::{Config as ConfigLoader, Environment, File, FileFormat, Source};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Error;

/// Default backend used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Client configuration for the clinic backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClinicConfig {
    /// Base URL of the clinic REST API (no trailing `/api`)
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Per-request timeout in seconds, `None` waits indefinitely
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Where the theme preference is stored, defaults to the user config dir
    #[serde(default)]
    pub preferences_path: Option<PathBuf>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn env_overrides() -> Environment {
    Environment::with_prefix("CLINIC").try_parsing(true)
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: None,
            preferences_path: None,
        }
    }
}

impl ClinicConfig {
    /// Create a config pointing at the given API base URL
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// Set the theme preference file
    pub fn with_preferences_path(mut self, path: PathBuf) -> Self {
        self.preferences_path = Some(path);
        self
    }

    /// Load from `$CLINIC_CONFIG_DIR/clinic.toml` (optional) overlaid with
    /// `CLINIC_*` environment variables
    pub fn load() -> Result<Self, Error> {
        let config_dir = env::var("CLINIC_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
        let file = File::with_name(&format!("{}/clinic", config_dir)).required(false);
        Self::load_layered(file, env_overrides())
    }

    /// Load an explicit TOML file, still overlaid with `CLINIC_*`
    /// environment variables
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let file = File::from(path).format(FileFormat::Toml).required(true);
        Self::load_layered(file, env_overrides())
    }

    fn load_layered<S>(file: S, env: Environment) -> Result<Self, Error>
    where
        S: Source + Send + Sync + 'static,
    {
        let settings = ConfigLoader::builder()
            .add_source(file)
            .add_source(env)
            .build()
            .map_err(|e| Error::Config(format!("Failed to load config: {}", e)))?;

        let config: ClinicConfig = settings
            .try_deserialize()
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, content)?;
        Ok(())
    }

    /// Default location of the theme preference file
    pub fn default_preferences_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("clinic-booking");
        path.push("preferences.toml");
        path
    }

    /// Resolved preference file path
    pub fn preferences_file(&self) -> PathBuf {
        self.preferences_path
            .clone()
            .unwrap_or_else(Self::default_preferences_path)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Reject URLs reqwest could never reach
    pub fn validate(&self) -> Result<(), Error> {
        let url = self.api_url.trim();
        if url.is_empty() {
            return Err(Error::Config("api_url must not be empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "api_url must start with http:// or https:// (got '{}')",
                url
            )));
        }
        Ok(())
    }

    /// Join an API path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_url.trim().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

use thiserror::Error;

/// SDK Error type
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level HTTP failure (connection refused, DNS, TLS, decode)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("API error ({status}): {}", message.as_deref().or(flag.as_deref()).unwrap_or("request failed"))]
    Api {
        status: u16,
        /// Machine readable failure flag, e.g. `InvalidCredentials`
        flag: Option<String>,
        message: Option<String>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local preference storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/Deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Backend failure flag, when the backend sent one
    pub fn flag(&self) -> Option<&str> {
        match self {
            Error::Api { flag, .. } => flag.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of a backend rejection
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

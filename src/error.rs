// src/error.rs

//! Unified error handling for the notice client.

use std::fmt;

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status code
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization failed
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Backend envelope reported `success: false`
    #[error("API error: {message}")]
    Api { message: String },

    /// A feed load failed
    #[error("Unable to load {feed} notices: {message}")]
    Fetch { feed: String, message: String },

    /// Manual backend refresh failed
    #[error("Refresh failed: {0}")]
    Refresh(String),

    /// A refresh is already running
    #[error("A refresh is already in progress")]
    RefreshInFlight,

    /// Local persisted state could not be read or written
    #[error("Persistence error for '{key}': {message}")]
    Persistence { key: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create an API envelope error.
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a feed fetch error.
    pub fn fetch(feed: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            feed: feed.into(),
            message: message.to_string(),
        }
    }

    /// Create a refresh error.
    pub fn refresh(message: impl fmt::Display) -> Self {
        Self::Refresh(message.to_string())
    }

    /// Create a persistence error for a storage key.
    pub fn persistence(key: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Persistence {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True for failed feed loads (inline banner, retry-capable).
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }

    /// True for failed or rejected refreshes (transient toast).
    pub fn is_refresh(&self) -> bool {
        matches!(self, Self::Refresh(_) | Self::RefreshInFlight)
    }

    /// True for local storage failures.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_message_names_feed() {
        let err = AppError::fetch("Central", "connection refused");
        assert!(err.is_fetch());
        assert_eq!(
            err.to_string(),
            "Unable to load Central notices: connection refused"
        );
    }

    #[test]
    fn test_error_classes_are_distinct() {
        assert!(AppError::RefreshInFlight.is_refresh());
        assert!(AppError::refresh("boom").is_refresh());
        assert!(!AppError::refresh("boom").is_fetch());
        assert!(AppError::persistence("k", "corrupt").is_persistence());
    }
}

//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "GOVTJOBS_API_URL";

/// Largest page the backend will serve.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Backend connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Page sizes per feed
    #[serde(default)]
    pub feed: FeedConfig,

    /// Refresh and toast behavior
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// CLI rendering
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Write configuration as TOML, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Apply environment overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                log::debug!("Using API base URL from {}", API_URL_ENV);
                self.api.base_url = url.trim().to_string();
            }
        }
        self
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.user_agent is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::validation("api.timeout_secs must be > 0"));
        }
        url::Url::parse(&self.api.base_url).map_err(|e| {
            AppError::validation(format!("api.base_url '{}': {}", self.api.base_url, e))
        })?;
        for (name, size) in [
            ("feed.page_size", self.feed.page_size),
            ("feed.dual_page_size", self.feed.dual_page_size),
            ("feed.engineering_page_size", self.feed.engineering_page_size),
        ] {
            if size == 0 || size > MAX_PAGE_SIZE {
                return Err(AppError::validation(format!(
                    "{name} must be between 1 and {MAX_PAGE_SIZE}"
                )));
            }
        }
        Ok(())
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the REST API, including the `/api` prefix
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Page sizes for each feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Aggregated feed page length
    #[serde(default = "defaults::page_size")]
    pub page_size: u32,

    /// Page length of each dual-feed column
    #[serde(default = "defaults::dual_page_size")]
    pub dual_page_size: u32,

    #[serde(default = "defaults::page_size")]
    pub engineering_page_size: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: defaults::page_size(),
            dual_page_size: defaults::dual_page_size(),
            engineering_page_size: defaults::page_size(),
        }
    }
}

/// Refresh behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// How long a refresh toast stays visible
    #[serde(default = "defaults::toast_secs")]
    pub toast_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            toast_secs: defaults::toast_secs(),
        }
    }
}

/// CLI output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Template passed to `Notice::format`
    #[serde(default = "defaults::notice_template")]
    pub notice_template: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            notice_template: defaults::notice_template(),
        }
    }
}

mod defaults {
    pub fn base_url() -> String {
        "http://localhost:8080/api".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; govtjobs/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn page_size() -> u32 {
        18
    }
    pub fn dual_page_size() -> u32 {
        15
    }
    pub fn toast_secs() -> u64 {
        3
    }
    pub fn notice_template() -> String {
        "{new} [{category}] {title} | {state} | last date: {last_date} | {link}".into()
    }
}

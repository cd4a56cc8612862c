//! Gateway configuration

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

#[derive(Clone)]
pub struct Config {
    /// Port to listen on
    pub port: u16,

    /// SQLite database location; in-memory stores when absent
    pub database_url: Option<String>,

    /// Shared secret sent as the `Authorization` header to every collaborator
    pub auth: String,

    pub twitter_url: String,
    pub google_url: String,
    pub recognition_url: String,

    /// Timeout for any single outbound collaborator call
    pub collaborator_timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("database_url", &self.database_url)
            .field("auth", &"<redacted>")
            .field("twitter_url", &self.twitter_url)
            .field("google_url", &self.google_url)
            .field("recognition_url", &self.recognition_url)
            .field("collaborator_timeout", &self.collaborator_timeout)
            .finish()
    }
}

impl Config {
    pub const DEFAULT_PORT: u16 = 5000;
    pub const DEFAULT_RECOGNITION_URL: &'static str = "http://localhost";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));

        let port = match lookup("PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value })?,
            None => Self::DEFAULT_PORT,
        };

        let timeout_secs = match lookup("COLLABORATOR_TIMEOUT_SECS") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "COLLABORATOR_TIMEOUT_SECS",
                value,
            })?,
            None => Self::DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            port,
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            auth: required("AUTH")?,
            twitter_url: required("TWITTER_URL")?,
            google_url: required("GOOGLE_URL")?,
            recognition_url: lookup("RECOGNITION_URL")
                .unwrap_or_else(|| Self::DEFAULT_RECOGNITION_URL.to_string()),
            collaborator_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Build the process-wide client used for every collaborator call
    pub fn http_client(&self) -> Result<reqwest::Client, ConfigError> {
        let mut auth = HeaderValue::from_str(&self.auth).map_err(|_| ConfigError::Invalid {
            name: "AUTH",
            value: "<redacted>".to_string(),
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.collaborator_timeout)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))
    }
}

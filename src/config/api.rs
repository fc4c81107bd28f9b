//! AI backend configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Where the AI backend (and its history endpoints) live
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL every tool path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Client-side request timeout in seconds; none by default
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ApiConfig {
    /// Absolute URL for a backend path
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Request timeout as Duration, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Validate backend configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_url.is_empty() {
            return Err(ValidationError::MissingRequired("API__BASE_URL"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidUrl("API__BASE_URL"));
        }
        if self.timeout_secs == Some(0) {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_user_agent() -> String {
    format!("adapta-ia/{}", env!("CARGO_PKG_VERSION"))
}

//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `ADAPTA_IA` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use adapta_ia::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Backend at {}", config.api.endpoint("/correct-essay"));
//! ```

mod api;
mod auth;
mod environment;
mod error;
mod limits;
mod logging;

pub use api::ApiConfig;
pub use auth::AuthConfig;
pub use environment::Environment;
pub use error::{ConfigError, ValidationError};
pub use limits::LimitsConfig;
pub use logging::{LogFormat, LoggingConfig};

use serde::Deserialize;
use std::path::Path;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// AI backend location and client settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Identity provider (Supabase Auth)
    pub auth: AuthConfig,

    /// Log filter and format
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Input limits enforced before calling the backend
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Deployment environment
    #[serde(default)]
    pub environment: Environment,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ADAPTA_IA` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `ADAPTA_IA__API__BASE_URL=...` -> `api.base_url = ...`
    /// - `ADAPTA_IA__AUTH__ANON_KEY=...` -> `auth.anon_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();
        Self::from_environment()
    }

    /// Load configuration after reading variables from a specific env file
    ///
    /// Unlike [`AppConfig::load()`], a missing or malformed file is an error.
    pub fn load_from_env_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        dotenvy::from_path(path.as_ref())?;
        Self::from_environment()
    }

    fn from_environment() -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ADAPTA_IA")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.api.validate()?;
        self.auth.validate(&self.environment)?;
        self.logging.validate()?;
        self.limits.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}

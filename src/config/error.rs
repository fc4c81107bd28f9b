//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Could not read env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid URL for {0}")]
    InvalidUrl(&'static str),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Auth URL must use HTTPS in production")]
    AuthUrlMustBeHttps,

    #[error("Invalid log filter directive: {0}")]
    InvalidLogLevel(String),

    #[error("Limit {0} must be greater than zero")]
    InvalidLimit(&'static str),
}

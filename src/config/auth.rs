//! Authentication configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::environment::Environment;
use super::error::ValidationError;

/// Identity provider configuration (Supabase Auth)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Supabase project URL
    pub supabase_url: String,

    /// Public anon key sent as `apikey`
    pub anon_key: Secret<String>,
}

impl AuthConfig {
    pub fn new(supabase_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            supabase_url: supabase_url.into(),
            anon_key: Secret::new(anon_key.into()),
        }
    }

    /// URL of the current-user endpoint
    pub fn user_url(&self) -> String {
        format!("{}/auth/v1/user", self.supabase_url.trim_end_matches('/'))
    }

    /// URL of the sign-out endpoint
    pub fn logout_url(&self) -> String {
        format!("{}/auth/v1/logout", self.supabase_url.trim_end_matches('/'))
    }

    /// Validate authentication configuration
    ///
    /// In production, requires HTTPS for the Supabase URL.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.supabase_url.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__SUPABASE_URL"));
        }
        if self.anon_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__ANON_KEY"));
        }
        if !self.supabase_url.starts_with("http://") && !self.supabase_url.starts_with("https://")
        {
            return Err(ValidationError::InvalidUrl("AUTH__SUPABASE_URL"));
        }
        if *environment == Environment::Production && !self.supabase_url.starts_with("https://") {
            return Err(ValidationError::AuthUrlMustBeHttps);
        }
        Ok(())
    }
}

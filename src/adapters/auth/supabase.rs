//! Supabase Auth adapter.
//!
//! This adapter implements the `IdentityProvider` port against Supabase's
//! GoTrue API. It holds the access token obtained by the login flow and
//! asks the provider who it belongs to on every call:
//!
//! 1. No token stored: nobody is signed in
//! 2. `GET {supabase_url}/auth/v1/user` with the `apikey` and bearer headers
//! 3. 2xx maps to a `Session`; 401/403 means the token is no longer valid
//!
//! # Example
//!
//! ```ignore
//! let identity = SupabaseIdentityProvider::new(config.auth.clone())?;
//! identity.set_access_token(token_from_login).await;
//! let session = identity.current_session().await?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, AuthenticatedUser, Session, UserId};
use crate::ports::IdentityProvider;

/// User object returned by `/auth/v1/user`.
#[derive(Debug, Deserialize)]
struct SupabaseUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Identity provider backed by Supabase Auth.
pub struct SupabaseIdentityProvider {
    config: AuthConfig,
    http_client: Client,
    access_token: RwLock<Option<Secret<String>>>,
}

impl SupabaseIdentityProvider {
    pub fn new(config: AuthConfig) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().build()?;
        Ok(Self::with_client(config, http_client))
    }

    pub fn with_client(config: AuthConfig, http_client: Client) -> Self {
        Self {
            config,
            http_client,
            access_token: RwLock::new(None),
        }
    }

    /// Stores the token handed out by the login flow.
    pub async fn set_access_token(&self, token: impl Into<String>) {
        *self.access_token.write().await = Some(Secret::new(token.into()));
    }

    async fn token(&self) -> Option<String> {
        self.access_token
            .read()
            .await
            .as_ref()
            .map(|t| t.expose_secret().clone())
    }

    fn authorized(&self, request: reqwest::RequestBuilder, token: &str) -> reqwest::RequestBuilder {
        request
            .header("apikey", self.config.anon_key.expose_secret())
            .bearer_auth(token)
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentityProvider {
    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        let Some(token) = self.token().await else {
            return Ok(None);
        };

        let response = self
            .authorized(self.http_client.get(self.config.user_url()), &token)
            .send()
            .await
            .map_err(|e| AuthError::service_unavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::debug!(status = status.as_u16(), "Access token refused");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(AuthError::service_unavailable(format!(
                "auth service returned {}",
                status
            )));
        }

        let user: SupabaseUser = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        let id = UserId::new(user.id).map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        Ok(Some(Session::new(
            AuthenticatedUser::new(id, user.email.unwrap_or_default()),
            token,
        )))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(token) = self.access_token.write().await.take() else {
            return Ok(());
        };

        let response = self
            .authorized(
                self.http_client.post(self.config.logout_url()),
                token.expose_secret(),
            )
            .send()
            .await
            .map_err(|e| AuthError::service_unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() && status != StatusCode::UNAUTHORIZED {
            tracing::warn!(status = status.as_u16(), "Remote sign-out failed");
        }
        Ok(())
    }
}

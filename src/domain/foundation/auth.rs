//! Authentication types for the domain layer.
//!
//! These types describe the identity the external auth provider hands back.
//! They have **no provider dependencies** - any provider (Supabase, a mock,
//! another OIDC service) can populate them via the `IdentityProvider` port.
//!
//! # Lifecycle
//!
//! A `Session` is fetched when a tool page mounts, held by that page, never
//! refreshed proactively and re-checked on every submission. Logging out
//! destroys it at the provider.

use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

use super::UserId;

/// The user behind the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The unique user identifier from the auth provider.
    pub id: UserId,

    /// User's email address.
    pub email: String,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}

/// Opaque identity token plus the user it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    user: AuthenticatedUser,
    access_token: Secret<String>,
}

impl Session {
    /// Creates a session for a user with its access token.
    pub fn new(user: AuthenticatedUser, access_token: impl Into<String>) -> Self {
        Self {
            user,
            access_token: Secret::new(access_token.into()),
        }
    }

    /// The authenticated user.
    pub fn user(&self) -> &AuthenticatedUser {
        &self.user
    }

    /// Shortcut for the user id, the only identity field sent to the backend.
    pub fn user_id(&self) -> &UserId {
        &self.user.id
    }

    /// Exposes the access token (for authenticated requests).
    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }
}

/// Failures of the identity provider itself.
///
/// An unauthenticated visitor is *not* an error: providers return `Ok(None)`.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The stored token was rejected as malformed.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The provider answered with something we could not read.
    #[error("Unexpected auth response: {0}")]
    InvalidResponse(String),

    /// The authentication service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed later.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}

//! Identity provider port - who is using the application right now.
//!
//! Session persistence and token refresh belong to the provider. Callers
//! only ask for the current session and may end it.
//!
//! # Example
//!
//! ```ignore
//! async fn whoami(identity: Arc<dyn IdentityProvider>) -> Option<UserId> {
//!     let session = identity.current_session().await.ok().flatten()?;
//!     Some(session.user_id().clone())
//! }
//! ```

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, Session};

/// Resolves the current authenticated session.
///
/// # Contract
///
/// Implementations must:
/// - Return `Ok(None)` when nobody is signed in or the token was refused
/// - Return `Err(AuthError::ServiceUnavailable)` for transient failures
/// - Never cache across calls; every call reflects the provider's view
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Fetch the current session, if any.
    async fn current_session(&self) -> Result<Option<Session>, AuthError>;

    /// Destroy the current session.
    async fn sign_out(&self) -> Result<(), AuthError>;
}

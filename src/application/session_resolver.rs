//! SessionResolver - Answers "who is using the app" for pages and submissions.
//!
//! Pages call [`SessionResolver::resolve`] on mount to decide what to show.
//! Every submission calls [`SessionResolver::require`] again because the
//! value cached by the page may be stale.

use std::sync::Arc;

use crate::domain::foundation::Session;
use crate::domain::tool::ToolError;
use crate::ports::IdentityProvider;

/// Thin policy layer over the identity provider.
#[derive(Clone)]
pub struct SessionResolver {
    identity: Arc<dyn IdentityProvider>,
}

impl SessionResolver {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self { identity }
    }

    /// Current session, or `None` when nobody is signed in.
    ///
    /// Provider failures are logged and treated as signed out.
    pub async fn resolve(&self) -> Option<Session> {
        match self.identity.current_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Could not resolve session");
                None
            }
        }
    }

    /// Session for a submission; fails fast with `LoginRequired`.
    pub async fn require(&self) -> Result<Session, ToolError> {
        self.resolve().await.ok_or(ToolError::LoginRequired)
    }

    pub async fn sign_out(&self) {
        if let Err(e) = self.identity.sign_out().await {
            tracing::warn!(error = %e, "Sign-out failed");
        }
    }
}

//! Mock identity provider for testing.
//!
//! Implements the `IdentityProvider` port without a real auth service.
//!
//! # Example
//!
//! ```ignore
//! use adapta_ia::adapters::auth::MockIdentityProvider;
//!
//! let identity = MockIdentityProvider::signed_in("user-123");
//! let session = identity.current_session().await?.unwrap();
//! assert_eq!(session.user_id().as_str(), "user-123");
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, Session, UserId};
use crate::ports::IdentityProvider;

/// Mock identity provider holding at most one session.
#[derive(Debug, Default)]
pub struct MockIdentityProvider {
    session: Mutex<Option<Session>>,
    /// Optional error to return for all lookups (for error testing)
    force_error: Mutex<Option<AuthError>>,
    calls: AtomicUsize,
}

impl MockIdentityProvider {
    /// A provider with nobody signed in.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A provider with a session for a simple test user.
    ///
    /// An empty id yields an anonymous provider.
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        let provider = Self::default();
        if let Ok(id) = UserId::new(user_id) {
            let email = format!("{}@test.example.com", id);
            provider.set_session(Some(Session::new(
                AuthenticatedUser::new(id, email),
                "mock-access-token",
            )));
        }
        provider
    }

    /// Forces every lookup to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *lock(&self.force_error) = Some(error);
        self
    }

    /// Replaces the current session.
    pub fn set_session(&self, session: Option<Session>) {
        *lock(&self.session) = session;
    }

    /// Clears the forced error.
    pub fn clear_error(&self) {
        *lock(&self.force_error) = None;
    }

    /// Number of `current_session` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = lock(&self.force_error).clone() {
            return Err(error);
        }
        Ok(lock(&self.session).clone())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.set_session(None);
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

//! Session-expiry policy.
//!
//! Every API call that comes back with an authorization failure goes through
//! [`SessionPolicy::on_auth_failure`] exactly once, before the failure reaches
//! the caller. The policy drops the stored session, tells the UI that the
//! session expired and asks it to navigate to the login view.

use std::sync::Arc;

use aprendices_core::{Credential, UserProfile};

use crate::error::Result;
use crate::store::{SessionState, SessionStore};

/// UI collaborator notified about session changes.
pub trait SessionObserver: Send + Sync {
    /// The server rejected the stored credential.
    fn session_expired(&self);

    /// The user must be sent to the login view.
    fn redirect_to_login(&self);
}

/// Observer that only logs. Used when no UI collaborator is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl SessionObserver for LoggingObserver {
    fn session_expired(&self) {
        tracing::warn!("Session expired, please log in again");
    }

    fn redirect_to_login(&self) {
        tracing::info!("Redirecting to login");
    }
}

/// Decides where credentials come from and how authorization failures are handled.
#[derive(Clone)]
pub struct SessionPolicy {
    store: Arc<dyn SessionStore>,
    observer: Arc<dyn SessionObserver>,
}

impl std::fmt::Debug for SessionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionPolicy")
            .field("logged_in", &self.store.credential().is_some())
            .finish_non_exhaustive()
    }
}

impl SessionPolicy {
    /// Create a policy over `store` that reports to `observer`.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, observer: Arc<dyn SessionObserver>) -> Self {
        Self { store, observer }
    }

    /// Create a policy over `store` with a [`LoggingObserver`].
    #[must_use]
    pub fn with_store(store: Arc<dyn SessionStore>) -> Self {
        Self::new(store, Arc::new(LoggingObserver))
    }

    /// The credential to attach to a call.
    ///
    /// Returns `None` when the call does not require one or nobody is
    /// logged in. A missing credential is not a client-side error; the
    /// server decides.
    #[must_use]
    pub fn credential_for(&self, requires_credential: bool) -> Option<Credential> {
        if requires_credential {
            self.store.credential()
        } else {
            None
        }
    }

    /// The cached user profile, if any.
    #[must_use]
    pub fn profile(&self) -> Option<UserProfile> {
        self.store.profile()
    }

    /// Returns `true` if a credential is stored.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.store.credential().is_some()
    }

    /// Record a successful login, replacing any previous session.
    ///
    /// Without a profile the slot holds no profile, even if an earlier login
    /// cached one.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be persisted.
    pub fn establish(&self, credential: Credential, profile: Option<UserProfile>) -> Result<()> {
        self.store.replace(SessionState {
            credential: Some(credential),
            profile,
        })?;
        tracing::info!("Session established");
        Ok(())
    }

    /// React to an authorization failure reported by the server.
    ///
    /// A store that cannot be cleared is logged; the notification and the
    /// redirect still happen.
    pub fn on_auth_failure(&self) {
        if let Err(e) = self.store.clear() {
            tracing::error!(error = %e, "Failed to clear session after authorization failure");
        }
        self.observer.session_expired();
        self.observer.redirect_to_login();
    }

    /// End the session at the user's request.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be cleared.
    pub fn logout(&self) -> Result<()> {
        self.store.clear()?;
        tracing::info!("Logged out");
        self.observer.redirect_to_login();
        Ok(())
    }
}

/// An observer that counts notifications, for tests.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
pub struct RecordingObserver {
    expired: std::sync::atomic::AtomicUsize,
    redirects: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-utils"))]
impl RecordingObserver {
    /// Number of session-expired notifications received.
    #[must_use]
    pub fn expired_count(&self) -> usize {
        self.expired.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Number of redirects requested.
    #[must_use]
    pub fn redirect_count(&self) -> usize {
        self.redirects.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl SessionObserver for RecordingObserver {
    fn session_expired(&self) {
        self.expired
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }

    fn redirect_to_login(&self) {
        self.redirects
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}

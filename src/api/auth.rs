//! The one place that decides what an authentication failure means.

use std::sync::{Arc, Mutex, PoisonError};

use zeroize::Zeroizing;

use super::session::SessionStore;

type Listener = Arc<dyn Fn() + Send + Sync>;

/// Centralized authentication policy.
///
/// Every request that needs a token asks the policy for it, and every 401
/// is reported back here: the stored token is cleared and the registered
/// listeners (for example a "show sign-in" prompt) are told once per event.
pub struct AuthPolicy {
    session: Arc<dyn SessionStore>,
    listeners: Mutex<Vec<Listener>>,
}

impl std::fmt::Debug for AuthPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthPolicy")
            .field("signed_in", &self.session.token().is_some())
            .finish_non_exhaustive()
    }
}

impl AuthPolicy {
    /// Policy over `session`.
    #[must_use]
    pub fn new(session: Arc<dyn SessionStore>) -> Self {
        Self {
            session,
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Token to send as `Authorization: Bearer`.
    #[must_use]
    pub fn bearer(&self) -> Option<Zeroizing<String>> {
        self.session.token()
    }

    /// Underlying session store.
    #[must_use]
    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    /// Call `listener` whenever the server rejects the session.
    pub fn on_unauthorized<F>(&self, listener: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(listener));
    }

    /// What: React to a 401.
    ///
    /// Details:
    /// - Clears the stored token (failures are logged)
    /// - Notifies listeners outside the lock
    pub fn handle_unauthorized(&self) {
        if let Err(e) = self.session.clear() {
            tracing::warn!(error = %e, "failed to clear session token");
        }
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        tracing::warn!(listeners = listeners.len(), "session rejected by server");
        for listener in &listeners {
            listener();
        }
    }
}

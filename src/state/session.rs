//! Shared session slot: current-user state, durable shadow, and the
//! invalidation signal.
//!
//! SYSTEM CONTEXT
//! ==============
//! The API client and the session store both hold an `Arc<SessionCell>`.
//! The store performs every transition except one: a 401 seen by the client
//! drops the session through [`SessionCell::invalidate`].
//!
//! EPOCHS
//! ======
//! Each request records the epoch current when it was sent. A 401 only
//! invalidates when the epoch is still the one the request saw, and the
//! invalidation itself advances it. Concurrent rejections from the same
//! session therefore clear state and signal exactly once, and a stale 401
//! from an earlier session never clears a newer one.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{broadcast, watch};

use crate::net::types::User;
use crate::util::shadow::SessionShadow;

const EVENT_CAPACITY: usize = 16;

/// Session lifecycle as seen by consumers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    /// Restoration has not resolved yet.
    #[default]
    Unknown,
    Anonymous,
    Authenticated(User),
}

impl SessionState {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Unknown | Self::Anonymous => None,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(User::is_admin)
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// Signals emitted by the session layer for the application to act on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// The backend rejected the session credential; local state was cleared.
    Invalidated,
}

/// Session slot shared by the API client and the store.
///
/// Outside this crate the slot is read-only: state can be observed but only
/// the store and the API client's 401 path can change it.
///
/// ```compile_fail
/// use std::sync::Arc;
/// use portal::state::session::SessionCell;
/// use portal::util::shadow::MemoryShadow;
///
/// let cell = SessionCell::new(Arc::new(MemoryShadow::new()));
/// cell.invalidate(cell.epoch());
/// ```
pub struct SessionCell {
    state: watch::Sender<SessionState>,
    epoch: AtomicU64,
    shadow: Arc<dyn SessionShadow>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionCell {
    #[must_use]
    pub fn new(shadow: Arc<dyn SessionShadow>) -> Self {
        let (state, _) = watch::channel(SessionState::Unknown);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { state, epoch: AtomicU64::new(0), shadow, events }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    pub(crate) fn shadow(&self) -> &dyn SessionShadow {
        self.shadow.as_ref()
    }

    /// Drop the session after a 401 observed by a request sent at `seen`.
    ///
    /// Returns `true` only for the call that actually performed the reset.
    pub(crate) fn invalidate(&self, seen: u64) -> bool {
        if self.epoch.compare_exchange(seen, seen.wrapping_add(1), Ordering::AcqRel, Ordering::Acquire).is_err() {
            return false;
        }
        self.shadow.clear();
        self.state.send_replace(SessionState::Anonymous);
        // No receivers is fine: nobody is listening for navigation.
        let _ = self.events.send(SessionEvent::Invalidated);
        tracing::info!(epoch = seen, "session invalidated by server");
        true
    }

    /// Make `user` current and persist it to the shadow.
    pub(crate) fn establish(&self, user: User) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.shadow.save(&user);
        self.state.send_replace(SessionState::Authenticated(user));
    }

    /// Show a shadowed user before it has been revalidated.
    pub(crate) fn assume(&self, user: User) {
        self.state.send_replace(SessionState::Authenticated(user));
    }

    /// Refresh the current user without opening a new session.
    ///
    /// Applies only while the session that sent the validation at `seen`
    /// is still current.
    pub(crate) fn refresh(&self, seen: u64, user: User) -> bool {
        if self.epoch() != seen || !self.state.borrow().is_authenticated() {
            return false;
        }
        self.shadow.save(&user);
        self.state.send_replace(SessionState::Authenticated(user));
        true
    }

    /// Drop an optimistic session whose validation at `seen` failed, unless a
    /// newer session operation already settled.
    pub(crate) fn discard(&self, seen: u64) -> bool {
        if self.epoch.compare_exchange(seen, seen.wrapping_add(1), Ordering::AcqRel, Ordering::Acquire).is_err() {
            return false;
        }
        self.shadow.clear();
        self.state.send_replace(SessionState::Anonymous);
        true
    }

    /// End the session locally.
    pub(crate) fn reset(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.shadow.clear();
        self.state.send_replace(SessionState::Anonymous);
    }

    /// Resolve `Unknown` to `Anonymous` without touching the epoch.
    pub(crate) fn resolve_anonymous(&self) {
        self.state.send_if_modified(|state| {
            if matches!(state, SessionState::Unknown) {
                *state = SessionState::Anonymous;
                true
            } else {
                false
            }
        });
    }
}

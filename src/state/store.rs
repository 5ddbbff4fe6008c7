//! Session store: the one owner of "who is logged in".
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages read derived facts (`is_authenticated`, `is_admin`) and call the
//! narrow mutation API (`restore`, `login`, `register`, `logout`). Route
//! guards watch [`SessionStore::subscribe`] to re-render on transitions.
//!
//! Concurrent login/logout calls are not serialized: whichever settles last
//! determines the state.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::session::{SessionCell, SessionState};
use crate::net::api::ApiClient;
use crate::net::error::ApiError;
use crate::net::types::User;

pub struct SessionStore {
    api: Arc<ApiClient>,
}

impl SessionStore {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    fn cell(&self) -> &SessionCell {
        self.api.session()
    }

    #[must_use]
    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    // =========================================================================
    // DERIVED FACTS
    // =========================================================================

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.cell().state()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.cell().subscribe()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.state().user().cloned()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    /// Elevated-role check against live state.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.state().is_admin()
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.state().is_resolved()
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// Resolve the initial `Unknown` state from the durable shadow.
    ///
    /// With a shadow, the user is shown optimistically and then revalidated
    /// against the backend; any failure drops back to anonymous. Calls after
    /// the state has resolved are no-ops.
    pub async fn restore(&self) {
        let cell = self.cell();
        if cell.state().is_resolved() {
            return;
        }
        let Some(user) = cell.shadow().load() else {
            cell.resolve_anonymous();
            tracing::debug!("no session shadow; starting anonymous");
            return;
        };

        tracing::debug!(user_id = %user.user_id, "restoring session from shadow");
        cell.assume(user);
        let seen = cell.epoch();
        match self.api.me().await {
            Ok(fresh) => {
                cell.refresh(seen, fresh);
            }
            Err(error) => {
                // A 401 already cleared everything inside the client.
                if cell.discard(seen) {
                    tracing::info!(%error, "session shadow rejected; starting anonymous");
                }
            }
        }
    }

    /// Run [`SessionStore::restore`] in the background.
    pub fn spawn_restore(self: &Arc<Self>) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move { store.restore().await })
    }

    /// Authenticate with email and password.
    ///
    /// # Errors
    ///
    /// Returns the API error unchanged; state is left as it was.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let user = self.api.login(email, password).await?;
        tracing::info!(user_id = %user.user_id, "logged in");
        self.cell().establish(user.clone());
        Ok(user)
    }

    /// Create an account and start its session.
    ///
    /// # Errors
    ///
    /// Returns the API error unchanged; state is left as it was.
    pub async fn register(&self, email: &str, password: &str, display_name: &str) -> Result<User, ApiError> {
        let user = self.api.register(email, password, display_name).await?;
        tracing::info!(user_id = %user.user_id, "registered");
        self.cell().establish(user.clone());
        Ok(user)
    }

    /// End the session. The server notification is best-effort; local state
    /// is cleared regardless.
    pub async fn logout(&self) {
        if let Err(error) = self.api.logout().await {
            tracing::warn!(%error, "logout request failed; clearing local session anyway");
        }
        self.cell().reset();
    }
}

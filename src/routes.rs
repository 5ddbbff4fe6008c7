//! Route table and navigation state.
//!
//! SYSTEM CONTEXT
//! ==============
//! The API client never navigates. It emits `SessionEvent::Invalidated`,
//! and [`spawn_login_redirect`] turns that into a single trip to `/login`.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::state::session::SessionEvent;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Experience,
    Projects,
    Blog,
    BlogNew,
    BlogPost(String),
    Login,
    NotFound(String),
}

impl Route {
    /// Match a URL path against the route table.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let trimmed = path.split(['?', '#']).next().unwrap_or_default().trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Self::Home,
            ["experience"] => Self::Experience,
            ["projects"] => Self::Projects,
            ["blog"] => Self::Blog,
            ["blog", "new"] => Self::BlogNew,
            ["blog", post_id] => Self::BlogPost((*post_id).to_owned()),
            ["login"] => Self::Login,
            _ => Self::NotFound(path.to_owned()),
        }
    }

    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_owned(),
            Self::Experience => "/experience".to_owned(),
            Self::Projects => "/projects".to_owned(),
            Self::Blog => "/blog".to_owned(),
            Self::BlogNew => "/blog/new".to_owned(),
            Self::BlogPost(post_id) => format!("/blog/{post_id}"),
            Self::Login => "/login".to_owned(),
            Self::NotFound(path) => path.clone(),
        }
    }

    /// Routes that must never render for an anonymous visitor.
    #[must_use]
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::BlogNew)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

// =============================================================================
// NAVIGATOR
// =============================================================================

/// Current route plus the history of every navigation.
pub struct Navigator {
    current: watch::Sender<Route>,
    history: Mutex<Vec<Route>>,
}

impl Navigator {
    #[must_use]
    pub fn new(initial: Route) -> Self {
        let (current, _) = watch::channel(initial.clone());
        Self { current, history: Mutex::new(vec![initial]) }
    }

    #[must_use]
    pub fn current(&self) -> Route {
        self.current.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }

    #[must_use]
    pub fn history(&self) -> Vec<Route> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn navigate(&self, route: Route) {
        tracing::debug!(%route, "navigate");
        self.history.lock().unwrap_or_else(PoisonError::into_inner).push(route.clone());
        self.current.send_replace(route);
    }

    /// Send the user to the login route unless they are already there.
    pub fn redirect_to_login(&self) -> bool {
        if self.current() == Route::Login {
            return false;
        }
        self.navigate(Route::Login);
        true
    }

    /// React to one session event.
    pub fn handle_session_event(&self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::Invalidated => self.redirect_to_login(),
        }
    }
}

/// Drive `navigator` from session events until the channel closes.
pub fn spawn_login_redirect(
    navigator: Arc<Navigator>,
    mut events: broadcast::Receiver<SessionEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    navigator.handle_session_event(event);
                }
                // Missed events all mean "invalidated"; one redirect covers them.
                Err(broadcast::error::RecvError::Lagged(_)) => {
                    navigator.handle_session_event(SessionEvent::Invalidated);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

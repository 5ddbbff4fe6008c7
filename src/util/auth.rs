//! Shared auth guard helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every page applies the same redirect rules, and destructive actions check
//! the live session at the moment they run rather than trusting whatever was
//! true when the page rendered.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::Comment;
use crate::routes::Route;
use crate::state::session::SessionState;

/// What a page should do given the current session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session not resolved yet; render nothing auth-dependent.
    Pending,
    Render,
    Redirect(Route),
}

/// Refusal for an action the current session may not perform.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    #[error("you need to sign in first")]
    NotAuthenticated,
    #[error("this action requires an administrator")]
    NotAdmin,
    #[error("you can only delete your own comments")]
    NotAuthor,
}

/// True when auth has resolved and nobody is logged in.
#[must_use]
pub fn should_redirect_unauth(state: &SessionState) -> bool {
    matches!(state, SessionState::Anonymous)
}

/// Decide whether `route` may render under `state`.
#[must_use]
pub fn guard_route(route: &Route, state: &SessionState) -> GuardDecision {
    match route {
        Route::Login => match state {
            SessionState::Unknown => GuardDecision::Pending,
            SessionState::Authenticated(_) => GuardDecision::Redirect(Route::Blog),
            SessionState::Anonymous => GuardDecision::Render,
        },
        route if route.requires_auth() => match state {
            SessionState::Unknown => GuardDecision::Pending,
            SessionState::Anonymous => GuardDecision::Redirect(Route::Login),
            SessionState::Authenticated(_) => GuardDecision::Render,
        },
        _ => GuardDecision::Render,
    }
}

/// Require any logged-in user.
///
/// # Errors
///
/// Returns [`AccessDenied::NotAuthenticated`] without a current user.
pub fn require_user(state: &SessionState) -> Result<(), AccessDenied> {
    if state.is_authenticated() { Ok(()) } else { Err(AccessDenied::NotAuthenticated) }
}

/// Require the elevated role.
///
/// # Errors
///
/// Returns why the current session may not act as an administrator.
pub fn require_admin(state: &SessionState) -> Result<(), AccessDenied> {
    require_user(state)?;
    if state.is_admin() { Ok(()) } else { Err(AccessDenied::NotAdmin) }
}

/// Admins may delete any comment; everyone else only their own.
#[must_use]
pub fn can_delete_comment(state: &SessionState, comment: &Comment) -> bool {
    match state.user() {
        Some(user) => user.is_admin() || user.user_id == comment.user_id,
        None => false,
    }
}

/// [`can_delete_comment`] as a checked precondition.
///
/// # Errors
///
/// Returns why the current session may not delete `comment`.
pub fn require_comment_delete(state: &SessionState, comment: &Comment) -> Result<(), AccessDenied> {
    require_user(state)?;
    if can_delete_comment(state, comment) { Ok(()) } else { Err(AccessDenied::NotAuthor) }
}

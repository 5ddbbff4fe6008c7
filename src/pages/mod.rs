//! Headless page controllers.
//!
//! DESIGN
//! ======
//! Each page loads its data, applies the session guard, and turns API
//! failures into the inline message the front end shows. Rendering lives in
//! the front end; nothing here prints.

pub mod blog;
pub mod content;
pub mod login;

use crate::net::error::{ApiError, extract_error_message};
use crate::routes::Route;
use crate::util::auth::AccessDenied;

/// Why a page action did not complete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    /// The page must not render; go here instead.
    #[error("redirect to {0}")]
    Redirect(Route),
    /// Inline message to show on the page.
    #[error("{0}")]
    Message(String),
}

impl From<AccessDenied> for PageError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::NotAuthenticated => Self::Redirect(Route::Login),
            other => Self::Message(other.to_string()),
        }
    }
}

/// Page message for an API failure, preferring the server's detail.
pub(crate) fn api_failure(err: &ApiError, fallback: &str) -> PageError {
    PageError::Message(extract_error_message(err, fallback))
}

/// Page message for an API failure that always uses `message`.
pub(crate) fn load_failure(err: &ApiError, message: &str) -> PageError {
    tracing::debug!(%err, "page load failed");
    PageError::Message(message.to_owned())
}

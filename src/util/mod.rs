//! Utility helpers shared across pages and the session store.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` holds the guard rules every page applies; `shadow` isolates the
//! durable user cache from session logic. `private_file` writes both
//! on-disk session files owner-only.

pub mod auth;
pub(crate) mod private_file;
pub mod shadow;

//! # portal
//!
//! Client core for the portfolio site: a credentialed REST client, the
//! cookie-session store that mirrors the logged-in user, route guards, and
//! headless page controllers that the terminal front end renders.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages call into the session store, the store calls the API client, and
//! the API client reports authentication rejections back through a
//! broadcast signal that the application wires to navigation.

pub mod config;
pub mod net;
pub mod pages;
pub mod routes;
pub mod state;
pub mod util;

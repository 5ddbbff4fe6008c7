//! Client-side session state.
//!
//! DESIGN
//! ======
//! `session` is the shared slot the API client and the store both touch;
//! `store` is the public face that pages use.

pub mod session;
pub mod store;

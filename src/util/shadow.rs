//! Durable shadow of the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The shadow only lets the next start show the last user without waiting
//! for the network. It is never authoritative: the store revalidates it on
//! load and discards it on any rejection. IO failures are logged and
//! otherwise ignored.

#[cfg(test)]
#[path = "shadow_test.rs"]
mod shadow_test;

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use super::private_file::{remove_if_present, write_private};
use crate::net::types::User;

/// A single key-value slot holding the serialized user.
pub trait SessionShadow: Send + Sync {
    /// Read the slot. Missing or unreadable content is `None`.
    fn load(&self) -> Option<User>;
    /// Replace the slot with `user`.
    fn save(&self, user: &User);
    /// Empty the slot.
    fn clear(&self);
}

// =============================================================================
// FILE SHADOW
// =============================================================================

/// Shadow stored as an owner-only JSON file.
pub struct FileShadow {
    path: PathBuf,
}

impl FileShadow {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SessionShadow for FileShadow {
    fn load(&self) -> Option<User> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(error) => {
                tracing::warn!(%error, path = %self.path.display(), "discarding unreadable user shadow");
                self.clear();
                None
            }
        }
    }

    fn save(&self, user: &User) {
        let Ok(raw) = serde_json::to_string(user) else {
            return;
        };
        if let Err(error) = write_private(&self.path, raw.as_bytes()) {
            tracing::warn!(%error, path = %self.path.display(), "failed to write user shadow");
        }
    }

    fn clear(&self) {
        if let Err(error) = remove_if_present(&self.path) {
            tracing::warn!(%error, path = %self.path.display(), "failed to remove user shadow");
        }
    }
}

// =============================================================================
// MEMORY SHADOW
// =============================================================================

/// Shadow kept in process memory, as serialized JSON.
#[derive(Default)]
pub struct MemoryShadow {
    slot: Mutex<Option<String>>,
}

impl MemoryShadow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the slot with raw content, valid or not.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self { slot: Mutex::new(Some(raw.into())) }
    }

    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl SessionShadow for MemoryShadow {
    fn load(&self) -> Option<User> {
        let raw = self.raw()?;
        let parsed = serde_json::from_str(&raw).ok();
        if parsed.is_none() {
            self.clear();
        }
        parsed
    }

    fn save(&self, user: &User) {
        if let Ok(raw) = serde_json::to_string(user) {
            *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(raw);
        }
    }

    fn clear(&self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

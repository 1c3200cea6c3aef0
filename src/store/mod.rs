//! Durable persistence of the session credential and cached profile.
//!
//! DESIGN
//! ======
//! The token and profile are one logical record: `get` returns both or
//! nothing, `clear` removes both. Only the session core writes here.
//!
//! Key/value backends (browser `localStorage`, in-memory maps) store the
//! two halves under separate keys. `KeyValueSessionStore` hides that split:
//! a token without a readable profile (or the reverse) reads as empty, and
//! `clear` drops the token first so a reader can never observe a
//! credential that has lost its profile.

pub mod file;


use std::collections::HashMap;
use std::sync::Mutex;

use crate::types::UserProfile;

pub use file::FileStore;

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "access_token";
/// Storage key for the JSON-serialized profile.
pub const PROFILE_KEY: &str = "user_data";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not serialize session: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Token and profile as last written by a successful login or verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistedSession {
    pub token: String,
    pub profile: UserProfile,
}

/// Synchronous-read persistence for exactly one session record.
pub trait SessionStore: Send + Sync {
    /// Both halves of the persisted session, or `None` if either is missing.
    fn get(&self) -> Option<PersistedSession>;

    /// Replace the persisted session.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the record could not be written. A failed
    /// write leaves the store empty rather than half-written.
    fn set(&self, token: &str, profile: &UserProfile) -> Result<(), StoreError>;

    /// Remove both halves.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend refused the removal.
    fn clear(&self) -> Result<(), StoreError>;
}

// =============================================================================
// KEY/VALUE BACKENDS
// =============================================================================

/// String key/value storage in the shape of the browser Storage API.
pub trait KeyValue: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend rejects the write.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend rejects the removal.
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

/// In-process key/value map.
#[derive(Debug, Default)]
pub struct MemoryKeyValue {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.items.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl KeyValue for MemoryKeyValue {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.items().remove(key);
        Ok(())
    }
}

/// Session store over two keys of a [`KeyValue`] backend.
#[derive(Debug, Default)]
pub struct KeyValueSessionStore<B> {
    backend: B,
}

/// Ephemeral store used by tests and throwaway clients.
pub type MemoryStore = KeyValueSessionStore<MemoryKeyValue>;

impl<B: KeyValue> KeyValueSessionStore<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl MemoryStore {
    /// Empty in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryKeyValue::new())
    }
}

impl<B: KeyValue> SessionStore for KeyValueSessionStore<B> {
    fn get(&self) -> Option<PersistedSession> {
        let token = self.backend.get_item(TOKEN_KEY).filter(|t| !t.is_empty())?;
        let raw = self.backend.get_item(PROFILE_KEY)?;
        match serde_json::from_str::<UserProfile>(&raw) {
            Ok(profile) => Some(PersistedSession { token, profile }),
            Err(e) => {
                tracing::warn!(error = %e, "persisted profile unreadable; treating session as absent");
                None
            }
        }
    }

    fn set(&self, token: &str, profile: &UserProfile) -> Result<(), StoreError> {
        let raw = serde_json::to_string(profile)?;
        let written = self
            .backend
            .set_item(PROFILE_KEY, &raw)
            .and_then(|()| self.backend.set_item(TOKEN_KEY, token));
        if let Err(e) = written {
            if let Err(clear_err) = self.clear() {
                tracing::error!(error = %clear_err, "failed to roll back partial session write");
            }
            return Err(e);
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let token = self.backend.remove_item(TOKEN_KEY);
        let profile = self.backend.remove_item(PROFILE_KEY);
        token.and(profile)
    }
}

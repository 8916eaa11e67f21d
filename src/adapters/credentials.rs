//! Credential storage
//!
//! The bearer token lives in a key/value store owned by the host. Readers look
//! it up by key on every use; nothing here caches decoded claims.

use crate::config::{secret_string, SecretString};
use std::collections::HashMap;
use std::sync::RwLock;

/// Read access to stored credentials
pub trait CredentialStore: Send + Sync {
    /// The secret stored under `key`, if any
    fn get(&self, key: &str) -> Option<SecretString>;
}

/// In-memory credential store
///
/// # Example
///
/// ```
/// use vaultflow::adapters::credentials::{CredentialStore, MemoryCredentialStore};
///
/// let store = MemoryCredentialStore::new();
/// store.insert("token", "header.payload.signature");
/// assert!(store.get("token").is_some());
/// assert!(store.get("refresh").is_none());
/// ```
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: RwLock<HashMap<String, SecretString>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with a single entry, or empty when `token` is `None`
    pub fn with_token(key: &str, token: Option<SecretString>) -> Self {
        let store = Self::new();
        if let Some(token) = token {
            store.insert_secret(key, token);
        }
        store
    }

    pub fn insert(&self, key: &str, value: impl Into<String>) {
        self.insert_secret(key, secret_string(value.into()));
    }

    pub fn insert_secret(&self, key: &str, value: SecretString) {
        match self.entries.write() {
            Ok(mut entries) => {
                entries.insert(key.to_string(), value);
            }
            Err(poisoned) => {
                poisoned.into_inner().insert(key.to_string(), value);
            }
        }
    }

    pub fn remove(&self, key: &str) {
        match self.entries.write() {
            Ok(mut entries) => {
                entries.remove(key);
            }
            Err(poisoned) => {
                poisoned.into_inner().remove(key);
            }
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Option<SecretString> {
        let entries = match self.entries.read() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.get(key).cloned()
    }
}

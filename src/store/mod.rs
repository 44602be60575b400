//! External key/value payload store.
//!
//! The tracker persists its table through whatever string store the client
//! offers. In the browser that is a cookie; in tests an in-memory map. The
//! store enforces no schema, so whatever comes back out of it is treated
//! as untrusted input by the reconciler.

use std::collections::HashMap;

use thiserror::Error;

mod cookie;

pub use cookie::CookieStore;

/// Errors that can occur while talking to the store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Stored payload is corrupt: {0}")]
    Corrupt(String),
}

/// Opaque string store scoped to one client.
pub trait PayloadStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store, used in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PayloadStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

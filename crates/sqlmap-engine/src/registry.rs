//! Statement registry: `namespace.id` → raw template text.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use sqlmap_core::errors::RegistryError;

/// Owned by one engine. Read-mostly: lookups share the lock, registration
/// takes it exclusively. Entries are never replaced or removed.
#[derive(Debug, Default)]
pub struct StatementRegistry {
    statements: RwLock<HashMap<String, Arc<str>>>,
}

impl StatementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `text` under `key`; an existing key is never overwritten.
    pub fn register(&self, key: &str, text: &str) -> Result<(), RegistryError> {
        // Entries are immutable once inserted, so a poisoned map is still valid.
        let mut statements = self.statements.write().unwrap_or_else(PoisonError::into_inner);
        if statements.contains_key(key) {
            return Err(RegistryError::DuplicateKey {
                key: key.to_string(),
            });
        }
        statements.insert(key.to_string(), Arc::from(text));
        Ok(())
    }

    pub fn lookup(&self, key: &str) -> Result<Arc<str>, RegistryError> {
        self.statements
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownStatement {
                key: key.to_string(),
            })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.statements
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.statements.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All registered keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .statements
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }
}

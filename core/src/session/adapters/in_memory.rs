use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::errors::StorageError;
use crate::session::storage::KeyValueStorage;

/// In-memory implementation of KeyValueStorage
#[derive(Debug, Default, Clone)]
pub struct InMemoryStorage {
    /// Thread-safe storage of raw values
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryStorage {
    /// Create a new, empty InMemoryStorage
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.read().map_err(|e| {
            StorageError::Poisoned(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.write().map_err(|e| {
            StorageError::Poisoned(format!("Failed to acquire write lock: {}", e))
        })?;

        values.insert(key.to_string(), value.to_string());
        debug!(key, "Stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self.values.write().map_err(|e| {
            StorageError::Poisoned(format!("Failed to acquire write lock: {}", e))
        })?;

        if values.remove(key).is_some() {
            debug!(key, "Removed value");
        }
        Ok(())
    }
}

use std::fmt::Debug;
use std::sync::Arc;

use crate::errors::StorageError;

/// Key/value string storage the session store persists into.
///
/// Implementations must make a single-key `get`/`set`/`remove` atomic. Values
/// are opaque strings; encoding is the session store's job.
pub trait KeyValueStorage: Send + Sync + Debug {
    /// Read the value stored under `key`, `None` when nothing is stored
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Type alias for Arc-wrapped KeyValueStorage trait objects
pub type StorageRef = Arc<dyn KeyValueStorage>;

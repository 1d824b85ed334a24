//! Key-value storage adapters.
//!
//! Documents are persisted one per key: the key is `"{kind}:{number}"` and
//! the value is the document's JSON. Adapters only deal in strings and know
//! nothing about documents.
//!
//! ## Example
//!
//! ```ignore
//! use folio::{InMemoryStorage, KeyValueStorage};
//!
//! let storage = InMemoryStorage::new();
//! storage.set("invoice:CON-2025-0001", r#"{"amount":100}"#)?;
//! assert_eq!(storage.list("invoice:")?, vec!["invoice:CON-2025-0001".to_string()]);
//! ```

mod file;
mod in_memory;

use std::fmt;
use std::sync::Arc;

pub use file::FileStorage;
pub use in_memory::InMemoryStorage;

/// Synchronous per-key storage consumed by the document store.
pub trait KeyValueStorage: Send + Sync {
    /// Read a value. Returns `None` if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any existing one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. Returns true if it existed.
    fn delete(&self, key: &str) -> Result<bool, StorageError>;

    /// All keys starting with `prefix`, in ascending order.
    fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<bool, StorageError> {
        (**self).delete(key)
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        (**self).list(prefix)
    }
}

/// Error type for storage adapter operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// An internal lock was poisoned by a panicking writer.
    LockPoisoned(&'static str),
    /// The backing medium failed for a specific key.
    Io { key: String, message: String },
    /// The backing store as a whole could not be reached.
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::LockPoisoned(operation) => {
                write!(f, "storage lock poisoned during {}", operation)
            }
            StorageError::Io { key, message } => {
                write!(f, "storage i/o error on {}: {}", key, message)
            }
            StorageError::Unavailable(msg) => write!(f, "storage unavailable: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

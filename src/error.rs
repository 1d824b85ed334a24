use std::fmt;

use crate::storage::StorageError;

/// Failure of a store operation. Callers can tell a failed write apart from
/// a no-op: a no-op is always an `Ok`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The storage adapter rejected a read, write or delete.
    Storage(StorageError),
    /// A document could not be serialized to JSON.
    Serde(String),
    /// Every candidate number tried for a new document was already taken.
    NumbersExhausted { prefix: String, attempts: u32 },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Storage(err) => write!(f, "document storage error: {}", err),
            StoreError::Serde(msg) => write!(f, "document serialization error: {}", msg),
            StoreError::NumbersExhausted { prefix, attempts } => write!(
                f,
                "no free {} document number after {} attempts",
                prefix, attempts
            ),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        StoreError::Storage(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}

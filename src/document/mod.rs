//! Document records and their kinds.

mod records;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;

pub use records::{Invoice, Receipt};

/// The category of a document. Determines the storage namespace and the
/// default number prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Invoice,
    Receipt,
}

impl DocumentKind {
    /// Key namespace, e.g. `"invoice"` in `"invoice:CON-2025-0001"`.
    pub fn namespace(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "invoice",
            DocumentKind::Receipt => "receipt",
        }
    }

    /// Prefix used for generated numbers unless the store config overrides it.
    pub fn default_prefix(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "CON",
            DocumentKind::Receipt => "RCP",
        }
    }

    /// Prefix passed to `KeyValueStorage::list` to enumerate this kind.
    pub fn key_prefix(&self) -> String {
        format!("{}:", self.namespace())
    }

    /// Storage key for a document number of this kind.
    pub fn key_for(&self, number: &str) -> String {
        format!("{}:{}", self.namespace(), number)
    }

    /// Inverse of [`key_for`](Self::key_for). Returns `None` for keys outside
    /// this kind's namespace.
    pub fn number_from_key<'k>(&self, key: &'k str) -> Option<&'k str> {
        key.strip_prefix(self.namespace())?.strip_prefix(':')
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.namespace())
    }
}

/// Trait for records a [`DocumentStore`](crate::DocumentStore) can hold.
///
/// Everything other than the number and the issue date is opaque to the
/// store. Usually implemented with `#[derive(Document)]`.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The kind every instance of this type belongs to.
    const KIND: DocumentKind;

    /// The document number, `None` until assigned.
    fn number(&self) -> Option<&str>;

    fn set_number(&mut self, number: String);

    /// Issue date as `YYYY-MM-DD`, `None` until the first save.
    fn date_issued(&self) -> Option<&str>;

    fn set_date_issued(&mut self, date: String);
}

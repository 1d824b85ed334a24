//! Invoice and receipt document store.
//!
//! A [`DocumentStore`] keeps an ordered, in-memory list of documents of one
//! [`DocumentKind`] and mirrors it to an injected [`KeyValueStorage`] under
//! `"{kind}:{number}"` keys. Saves are upserts keyed on the document number;
//! missing numbers are generated as `CON-2025-0001` style sequences or
//! `RCP-20250314-4821` date/random composites.
//!
//! ```ignore
//! use folio::{DocumentStore, InMemoryStorage, Invoice};
//!
//! let mut invoices = DocumentStore::<Invoice, _>::open(InMemoryStorage::new());
//! let saved = invoices.save(Invoice::new().with_field("amount", 100))?;
//! assert!(saved.document.document_number.is_some());
//! ```

// Lets `#[derive(Document)]` expand to `folio::...` paths inside this crate too.
extern crate self as folio;

mod document;
mod error;
mod events;
mod numbering;
mod storage;
mod store;

pub use document::{Document, DocumentKind, Invoice, Receipt};
pub use error::StoreError;
pub use events::{StoreChange, StoreEvent};
#[cfg(feature = "emitter")]
pub use events::StoreEvents;
pub use numbering::{Clock, FixedClock, NumberingScheme, SystemClock};
pub use storage::{FileStorage, InMemoryStorage, KeyValueStorage, StorageError};
pub use store::{DocumentStore, LoadReport, Saved, StoreConfig};

pub use folio_macros::Document;

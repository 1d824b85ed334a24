//! DocumentStore - the in-memory document list mirrored to key-value storage.
//!
//! Every document of a kind is stored under `"{kind}:{number}"`, one key per
//! document, so a save with an existing number replaces that record. Writes
//! hit storage first; the in-memory list is only updated once storage has
//! accepted the change.
//!
//! ## Example
//!
//! ```ignore
//! use folio::{DocumentStore, InMemoryStorage, Receipt};
//!
//! let mut receipts = DocumentStore::<Receipt, _>::open(InMemoryStorage::new());
//! let saved = receipts.save(Receipt::new().with_field("amount", 250))?;
//! receipts.delete(saved.document.document_number.as_deref().unwrap())?;
//! ```

mod config;

use std::sync::Arc;

use chrono::Datelike;
use tracing::{debug, error, warn};

use crate::events::StoreEvent;
#[cfg(feature = "emitter")]
use crate::events::{StoreChange, StoreEvents};
use crate::numbering::{self, Clock, NumberingScheme, SystemClock};
use crate::{Document, DocumentKind, KeyValueStorage, StorageError, StoreError};

pub use config::StoreConfig;

/// Outcome of [`DocumentStore::load`]. Loading never fails; anything that
/// could not be read is reported here instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Documents now in memory.
    pub loaded: usize,
    /// Keys whose value could not be read or parsed.
    pub skipped: Vec<String>,
    /// Set when the namespace could not be listed at all. The collection is
    /// empty in that case.
    pub backing_error: Option<StorageError>,
}

impl LoadReport {
    /// True when every stored document was loaded.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.backing_error.is_none()
    }
}

/// A successfully persisted document.
#[derive(Debug, Clone, PartialEq)]
pub struct Saved<D> {
    /// The document as stored, including any generated number and date.
    pub document: D,
    /// Whether a record with the same number was overwritten.
    pub replaced: bool,
}

/// Ordered collection of one document kind backed by a [`KeyValueStorage`].
///
/// The store owns the in-memory list; the storage owns the durable copy.
/// There is one writer: all mutations take `&mut self`.
pub struct DocumentStore<D, S> {
    storage: S,
    config: StoreConfig,
    clock: Arc<dyn Clock>,
    documents: Vec<D>,
    current: Option<D>,
    #[cfg(feature = "emitter")]
    events: StoreEvents,
}

impl<D: Document, S: KeyValueStorage> DocumentStore<D, S> {
    /// Create an empty store with the kind's default config. Nothing is read
    /// from storage until [`load`](Self::load).
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, StoreConfig::for_kind(D::KIND))
    }

    pub fn with_config(storage: S, config: StoreConfig) -> Self {
        Self {
            storage,
            config,
            clock: Arc::new(SystemClock),
            documents: Vec::new(),
            current: None,
            #[cfg(feature = "emitter")]
            events: StoreEvents::new(),
        }
    }

    /// Create a store and load whatever is already persisted.
    pub fn open(storage: S) -> Self {
        let mut store = Self::new(storage);
        store.load();
        store
    }

    /// Replace the clock used for number generation and issue dates.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn kind(&self) -> DocumentKind {
        D::KIND
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The loaded documents, in storage key order followed by documents
    /// appended since the last load.
    pub fn documents(&self) -> &[D] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Look up a loaded document by number.
    pub fn get(&self, number: &str) -> Option<&D> {
        self.documents.iter().find(|doc| doc.number() == Some(number))
    }

    /// Replace the in-memory collection with what storage currently holds.
    ///
    /// Unreadable or malformed entries are skipped. If the namespace cannot
    /// be listed the collection becomes empty. Either way the old collection
    /// is swapped out in one step.
    pub fn load(&mut self) -> LoadReport {
        let kind = D::KIND;

        let keys = match self.storage.list(&kind.key_prefix()) {
            Ok(keys) => keys,
            Err(err) => {
                warn!(kind = %kind, error = %err, "no documents available, starting empty");
                self.documents = Vec::new();
                self.notify(StoreEvent::Loaded, None, 0);
                return LoadReport {
                    loaded: 0,
                    skipped: Vec::new(),
                    backing_error: Some(err),
                };
            }
        };

        let mut documents = Vec::with_capacity(keys.len());
        let mut skipped = Vec::new();

        for key in keys {
            match self.read_document(&key) {
                Ok(Some(document)) => documents.push(document),
                // Removed between list and get.
                Ok(None) => {}
                Err(err) => {
                    warn!(kind = %kind, key = %key, error = %err, "skipping unreadable document");
                    skipped.push(key);
                }
            }
        }

        let loaded = documents.len();
        self.documents = documents;
        debug!(kind = %kind, loaded, skipped = skipped.len(), "documents loaded");
        self.notify(StoreEvent::Loaded, None, loaded);

        LoadReport {
            loaded,
            skipped,
            backing_error: None,
        }
    }

    /// The next number by the configured scheme, from the loaded count alone.
    ///
    /// Does not touch storage and does not check that the number is free;
    /// [`save`](Self::save) does that before using one.
    pub fn generate_number(&self) -> String {
        self.config
            .scheme
            .generate(&self.config.prefix, self.clock.today(), self.documents.len())
    }

    /// Insert or replace a document, keyed by its number.
    ///
    /// A missing number is allocated (never reusing one that is taken) and a
    /// missing issue date is set to today. The in-memory collection changes
    /// only after storage accepted the write.
    pub fn save(&mut self, mut document: D) -> Result<Saved<D>, StoreError> {
        let kind = D::KIND;

        let supplied = document
            .number()
            .filter(|number| !number.is_empty())
            .map(str::to_string);

        let number = match supplied {
            Some(number) => number,
            None => {
                let number = match self.allocate_number() {
                    Ok(number) => number,
                    Err(err) => {
                        error!(kind = %kind, error = %err, "error numbering document");
                        return Err(err);
                    }
                };
                document.set_number(number.clone());
                number
            }
        };

        if document.date_issued().is_none() {
            document.set_date_issued(self.clock.today().format("%Y-%m-%d").to_string());
        }

        let replaced = match self.persist(&number, &document) {
            Ok(replaced) => replaced,
            Err(err) => {
                error!(kind = %kind, number = %number, error = %err, "error saving document");
                return Err(err);
            }
        };

        match self
            .documents
            .iter_mut()
            .find(|doc| doc.number() == Some(number.as_str()))
        {
            Some(existing) => *existing = document.clone(),
            None => self.documents.push(document.clone()),
        }

        debug!(kind = %kind, number = %number, replaced, "document saved");
        let count = self.documents.len();
        self.notify(StoreEvent::Saved, Some(number), count);

        Ok(Saved { document, replaced })
    }

    /// Remove a document from storage and memory.
    ///
    /// Returns `Ok(false)` when nothing with that number exists.
    pub fn delete(&mut self, number: &str) -> Result<bool, StoreError> {
        let kind = D::KIND;

        let existed = match self.storage.delete(&kind.key_for(number)) {
            Ok(existed) => existed,
            Err(err) => {
                error!(kind = %kind, number = %number, error = %err, "error deleting document");
                return Err(err.into());
            }
        };

        let before = self.documents.len();
        self.documents.retain(|doc| doc.number() != Some(number));
        let removed = existed || self.documents.len() != before;

        if removed {
            debug!(kind = %kind, number = %number, "document deleted");
            let count = self.documents.len();
            self.notify(StoreEvent::Deleted, Some(number.to_string()), count);
        }

        Ok(removed)
    }

    /// Delete every key in this kind's namespace and empty the collection.
    /// Returns how many keys were removed. Meant for tests and resets.
    ///
    /// If a delete fails part way the collection is reloaded so it matches
    /// what is left in storage.
    pub fn clear_all(&mut self) -> Result<usize, StoreError> {
        let kind = D::KIND;

        let keys = match self.storage.list(&kind.key_prefix()) {
            Ok(keys) => keys,
            Err(err) => {
                error!(kind = %kind, error = %err, "error clearing documents");
                return Err(err.into());
            }
        };

        let mut removed = 0;
        for key in &keys {
            match self.storage.delete(key) {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(err) => {
                    error!(kind = %kind, key = %key, removed, error = %err, "error clearing documents");
                    self.load();
                    return Err(err.into());
                }
            }
        }

        self.documents.clear();
        debug!(kind = %kind, removed, "documents cleared");
        self.notify(StoreEvent::Cleared, None, removed);

        Ok(removed)
    }

    /// The document the view currently has selected.
    pub fn current(&self) -> Option<&D> {
        self.current.as_ref()
    }

    /// Set or clear the selection. The store never changes it on its own,
    /// not even when the selected document is deleted.
    pub fn set_current(&mut self, document: Option<D>) {
        let number = document
            .as_ref()
            .and_then(|doc| doc.number())
            .map(str::to_string);
        self.current = document;
        let count = self.documents.len();
        self.notify(StoreEvent::CurrentChanged, number, count);
    }

    /// Select a loaded document by number. Clears the selection if there is
    /// no such document.
    pub fn select(&mut self, number: &str) -> Option<&D> {
        let found = self.get(number).cloned();
        self.set_current(found);
        self.current.as_ref()
    }

    /// Register a change listener. Returns an id for [`off`](Self::off).
    #[cfg(feature = "emitter")]
    pub fn on<F>(&mut self, event: StoreEvent, listener: F) -> String
    where
        F: Fn(StoreChange) + Send + Sync + 'static,
    {
        self.events.on(event, listener)
    }

    /// Remove a change listener. Returns true if it was registered.
    #[cfg(feature = "emitter")]
    pub fn off(&mut self, listener_id: &str) -> bool {
        self.events.off(listener_id)
    }

    fn read_document(&self, key: &str) -> Result<Option<D>, StoreError> {
        let Some(raw) = self.storage.get(key)? else {
            return Ok(None);
        };
        let mut document: D = serde_json::from_str(&raw)?;

        // The key is authoritative for the number.
        if let Some(number) = D::KIND.number_from_key(key) {
            if document.number() != Some(number) {
                document.set_number(number.to_string());
            }
        }

        Ok(Some(document))
    }

    /// Write one document. Returns whether its key already existed.
    fn persist(&self, number: &str, document: &D) -> Result<bool, StoreError> {
        let key = D::KIND.key_for(number);
        let json = serde_json::to_string(document)?;
        let existed = self.storage.get(&key)?.is_some();
        self.storage.set(&key, &json)?;
        Ok(existed)
    }

    fn is_taken(&self, number: &str) -> Result<bool, StoreError> {
        if self.get(number).is_some() {
            return Ok(true);
        }
        Ok(self.storage.get(&D::KIND.key_for(number))?.is_some())
    }

    /// A number not used in memory or in storage.
    ///
    /// Sequential numbering starts from the count-based candidate and, if
    /// that is taken, continues after the highest sequence for the year found
    /// in storage keys or in memory. Date/random numbering re-rolls, trying at
    /// most `max_number_attempts` candidates in total.
    fn allocate_number(&self) -> Result<String, StoreError> {
        let first = self.generate_number();
        if !self.is_taken(&first)? {
            return Ok(first);
        }

        let prefix = &self.config.prefix;
        match self.config.scheme {
            NumberingScheme::Sequential => {
                let year = self.clock.today().year();
                let highest = self.highest_sequence(year)?.max(self.documents.len());
                Ok(numbering::sequential(prefix, year, highest + 1))
            }
            NumberingScheme::DateRandom => {
                let attempts = self.config.max_number_attempts.max(1);
                for _ in 1..attempts {
                    let candidate = self.generate_number();
                    if !self.is_taken(&candidate)? {
                        return Ok(candidate);
                    }
                }
                Err(StoreError::NumbersExhausted {
                    prefix: prefix.clone(),
                    attempts,
                })
            }
        }
    }

    /// Highest `{prefix}-{year}-NNNN` sequence among stored keys and loaded
    /// documents. Storage is listed so writes by other stores sharing the
    /// backing are seen.
    fn highest_sequence(&self, year: i32) -> Result<usize, StoreError> {
        let stem = format!("{}-{}-", self.config.prefix, year);
        let sequence = |number: &str| number.strip_prefix(&stem)?.parse::<usize>().ok();

        let stored = self
            .storage
            .list(&D::KIND.key_prefix())?
            .iter()
            .filter_map(|key| D::KIND.number_from_key(key).and_then(sequence))
            .max();
        let loaded = self
            .documents
            .iter()
            .filter_map(|doc| doc.number().and_then(sequence))
            .max();

        Ok(stored.max(loaded).unwrap_or(0))
    }

    #[cfg(feature = "emitter")]
    fn notify(&mut self, event: StoreEvent, number: Option<String>, count: usize) {
        self.events.emit(
            event,
            StoreChange {
                kind: D::KIND,
                number,
                count,
            },
        );
    }

    #[cfg(not(feature = "emitter"))]
    fn notify(&mut self, _event: StoreEvent, _number: Option<String>, _count: usize) {}
}

#[cfg(feature = "emitter")]
use event_emitter_rs::EventEmitter;
use serde::{Deserialize, Serialize};

use crate::DocumentKind;

/// Store notifications a view layer can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreEvent {
    /// The collection was replaced from storage. `count` is the new size.
    Loaded,
    /// A document was written. `number` is its number.
    Saved,
    /// A document was removed. `number` is its number.
    Deleted,
    /// The namespace was purged. `count` is how many keys were removed.
    Cleared,
    /// The current-selection slot changed. `number` is the new selection.
    CurrentChanged,
}

impl StoreEvent {
    pub fn name(&self) -> &'static str {
        match self {
            StoreEvent::Loaded => "Loaded",
            StoreEvent::Saved => "Saved",
            StoreEvent::Deleted => "Deleted",
            StoreEvent::Cleared => "Cleared",
            StoreEvent::CurrentChanged => "CurrentChanged",
        }
    }
}

/// Payload delivered to listeners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreChange {
    pub kind: DocumentKind,
    pub number: Option<String>,
    /// Size of the in-memory collection after the change, or the number of
    /// keys removed for [`StoreEvent::Cleared`].
    pub count: usize,
}

/// Listener registry for one store.
///
/// Listeners run on emitter-spawned threads, not on the thread that mutated
/// the store.
#[cfg(feature = "emitter")]
pub struct StoreEvents {
    emitter: EventEmitter,
}

#[cfg(feature = "emitter")]
impl Default for StoreEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "emitter")]
impl StoreEvents {
    pub fn new() -> Self {
        Self {
            emitter: EventEmitter::new(),
        }
    }

    /// Register a listener. Returns an id for [`off`](Self::off).
    pub fn on<F>(&mut self, event: StoreEvent, listener: F) -> String
    where
        F: Fn(StoreChange) + Send + Sync + 'static,
    {
        self.emitter.on(event.name(), listener)
    }

    /// Remove a listener. Returns true if it was registered.
    pub fn off(&mut self, listener_id: &str) -> bool {
        self.emitter.remove_listener(listener_id).is_some()
    }

    pub(crate) fn emit(&mut self, event: StoreEvent, change: StoreChange) {
        self.emitter.emit(event.name(), change);
    }
}

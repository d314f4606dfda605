//! # Listener registry - event name to ordered registrations.
//!
//! ## Architecture
//! ```text
//! Registry
//!   "save" ─► Arc<[Registration]>  [ {cb1, ctx1}, {cb2, ctx2}, ... ]
//!   "quit" ─► Arc<[Registration]>  [ ]                 (present, empty)
//! ```
//!
//! ## Rules
//! - Sequences are immutable; every mutation builds and swaps a new one
//! - A snapshot handed to a dispatch never changes under it
//! - Order within a sequence is registration order
//! - No deduplication: the same registration can appear several times
//! - Removals hand the replaced sequences back to the caller, which drops them
//!   after releasing the bus lock (a context's `Drop` may call into the bus)

use std::collections::HashMap;
use std::sync::Arc;

use crate::listeners::{Callback, Context};

/// One subscriber's interest in one event name.
#[derive(Clone, Debug)]
pub struct Registration {
    callback: Callback,
    context: Context,
}

impl Registration {
    /// Pairs `callback` with the receiver it is invoked with.
    pub fn new(callback: Callback, context: Context) -> Self {
        Self { callback, context }
    }

    /// The registered callback.
    pub fn callback(&self) -> &Callback {
        &self.callback
    }

    /// The receiver bound at registration time.
    pub fn context(&self) -> &Context {
        &self.context
    }
}

/// Immutable, shareable list of registrations for one event.
pub type Snapshot = Arc<[Registration]>;

/// Mapping from event name to its registrations.
#[derive(Default)]
pub struct Registry {
    events: HashMap<String, Snapshot>,
}

impl Registry {
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            events: capacity.map(HashMap::with_capacity).unwrap_or_default(),
        }
    }

    /// Appends a registration, creating the key if needed.
    pub fn insert(&mut self, event: &str, registration: Registration) -> usize {
        let next: Snapshot = match self.events.get(event) {
            Some(current) => current
                .iter()
                .cloned()
                .chain(std::iter::once(registration))
                .collect(),
            None => Arc::from(vec![registration]),
        };
        let len = next.len();
        self.events.insert(event.to_owned(), next);
        len
    }

    /// Replaces the sequence with the registrations whose callback is not
    /// `callback`. Stores an empty sequence when the key was absent.
    ///
    /// Returns the number of registrations removed and the replaced sequence.
    pub fn remove_callback(
        &mut self,
        event: &str,
        callback: &Callback,
    ) -> (usize, Option<Snapshot>) {
        let kept: Vec<Registration> = self
            .events
            .get(event)
            .map(|current| {
                current
                    .iter()
                    .filter(|r| !r.callback.ptr_eq(callback))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let removed = self.len_of(event) - kept.len();
        let old = self.events.insert(event.to_owned(), Arc::from(kept));
        (removed, old)
    }

    /// Takes the key out entirely, returning its sequence.
    pub fn remove_event(&mut self, event: &str) -> Option<Snapshot> {
        self.events.remove(event)
    }

    /// Empties the registry, returning everything it held.
    pub fn take_all(&mut self) -> HashMap<String, Snapshot> {
        std::mem::take(&mut self.events)
    }

    /// Cheap handle to the current sequence (an `Arc` clone).
    pub fn snapshot(&self, event: &str) -> Option<Snapshot> {
        self.events.get(event).cloned()
    }

    pub fn len_of(&self, event: &str) -> usize {
        self.events.get(event).map_or(0, |s| s.len())
    }

    pub fn contains(&self, event: &str) -> bool {
        self.events.contains_key(event)
    }

    pub fn names(&self) -> Vec<String> {
        self.events.keys().cloned().collect()
    }
}

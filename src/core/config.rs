//! # Bus configuration.
//!
//! Provides [`BusConfig`] centralized settings for an [`EventBus`](crate::EventBus).
//!
//! Config is used in two ways:
//! 1. **Direct creation**: `EventBus::with_config(config)`
//! 2. **Builder**: `EventBus::builder().with_config(config).build()`
//!
//! ## Sentinel values
//! - `initial_capacity = 0` → no pre-allocation of the registry

use crate::policies::FailurePolicy;

/// Configuration for one event bus.
///
/// ## Field semantics
/// - `failure`: What a failing listener does to the rest of the dispatch
/// - `initial_capacity`: Number of event names to pre-allocate (`0` = none)
/// - `trace_dispatch`: Emit a `trace` record per dispatch
#[derive(Clone, Debug)]
pub struct BusConfig {
    /// Failure handling during `emit`.
    ///
    /// Default is [`FailurePolicy::Propagate`]: the first error aborts the dispatch.
    pub failure: FailurePolicy,

    /// Registry pre-allocation hint (distinct event names).
    pub initial_capacity: usize,

    /// Whether `emit` records a `trace` event with the listener count.
    ///
    /// Turn off on very hot event names when a `trace` filter is enabled globally.
    pub trace_dispatch: bool,
}

impl BusConfig {
    /// Returns the pre-allocation hint as an `Option`.
    ///
    /// - `None` → start with an empty, unallocated registry
    /// - `Some(n)` → reserve room for `n` event names
    #[inline]
    pub fn capacity_hint(&self) -> Option<usize> {
        if self.initial_capacity == 0 {
            None
        } else {
            Some(self.initial_capacity)
        }
    }
}

impl Default for BusConfig {
    /// Default configuration:
    ///
    /// - `failure = FailurePolicy::Propagate` (no isolation between listeners)
    /// - `initial_capacity = 0` (no pre-allocation)
    /// - `trace_dispatch = true`
    fn default() -> Self {
        Self {
            failure: FailurePolicy::default(),
            initial_capacity: 0,
            trace_dispatch: true,
        }
    }
}

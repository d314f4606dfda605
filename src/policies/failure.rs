//! # Failure policies for event dispatch.
//!
//! [`FailurePolicy`] decides what `emit` does when a listener fails.
//!
//! - [`FailurePolicy::Propagate`] the first error aborts the dispatch and is returned (default).
//! - [`FailurePolicy::Isolate`] every listener runs inside its own failure boundary.
//!
//! ## Choosing the right policy
//!
//! **Strict pipelines** (later listeners depend on earlier ones):
//! ```text
//! FailurePolicy::Propagate      → listener #2 fails → #3.. skipped, emit returns Err
//!                                 listener panics   → panic unwinds through emit
//! ```
//!
//! **Independent observers** (audit, metrics, UI refresh):
//! ```text
//! FailurePolicy::Isolate        → listener #2 fails/panics → logged, #3.. still run
//!                                 ListenerError::Fatal      → dispatch stops, emit returns Err
//! ```

/// Policy controlling how listener failures affect a dispatch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// No isolation between listeners (default).
    #[default]
    Propagate,
    /// Catch errors and panics per listener; log them and keep dispatching.
    Isolate,
}

impl FailurePolicy {
    /// True when failures are caught per listener.
    #[inline]
    pub fn isolates(self) -> bool {
        matches!(self, FailurePolicy::Isolate)
    }
}

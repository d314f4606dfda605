//! Dispatch policies.
//!
//! ## Contents
//! - [`FailurePolicy`] what a listener failure does to the rest of the dispatch
//!
//! ## Quick wiring
//! ```text
//! BusConfig { failure: FailurePolicy, .. }
//!      └─► EventBus::emit uses it per registration:
//!           - Propagate → `?` on the listener result
//!           - Isolate   → catch_unwind + log + continue
//! ```

mod failure;

pub use failure::FailurePolicy;

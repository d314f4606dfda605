//! # Typed events.
//!
//! The bus itself is keyed by plain strings and carries untyped [`Payload`]s.
//! The [`Event`] trait binds an event-name literal to the argument type its
//! listeners expect, so publishers and subscribers agree at compile time.
//!
//! A typed event travels as a one-argument payload holding `E::Args`, so
//! untyped listeners registered under the same name still see it.
//!
//! ## Example
//! ```rust
//! use eventbus::{Context, Event, EventBus};
//!
//! struct Saved;
//!
//! impl Event for Saved {
//!     const NAME: &'static str = "save";
//!     type Args = (u64, String);
//! }
//!
//! let bus = EventBus::new();
//! bus.on_event::<Saved, ()>(Context::none(), |_, args: &(u64, String)| {
//!     let (id, path) = args;
//!     assert_eq!(*id, 42);
//!     assert_eq!(path, "/tmp/doc");
//!     Ok(())
//! });
//!
//! bus.emit_event::<Saved>((42, "/tmp/doc".to_string())).unwrap();
//! ```

use std::any::Any;

use super::payload::Payload;
use crate::error::ListenerError;

/// Compile-time description of a named event.
pub trait Event: 'static {
    /// Registry key used for this event.
    const NAME: &'static str;

    /// Argument type handed to typed listeners.
    type Args: Any + Send + Sync;

    /// Wraps arguments into the payload the bus forwards.
    fn payload(args: Self::Args) -> Payload {
        Payload::single(args)
    }

    /// Extracts typed arguments from a forwarded payload.
    fn args(payload: &Payload) -> Result<&Self::Args, ListenerError> {
        payload.require::<Self::Args>(0)
    }
}

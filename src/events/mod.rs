//! Event data: payloads and typed event descriptors.
//!
//! ## Contents
//! - [`Payload`] ordered, untyped argument list forwarded to listeners
//! - [`Event`] binds an event-name literal to its argument type
//!
//! The bus never looks inside either; they only travel from `emit` to callbacks.

mod event;
mod payload;

pub use event::Event;
pub use payload::{Arg, Payload};

//! # Listeners: what gets called when an event is announced.
//!
//! Two styles are supported and can be mixed under the same event name:
//!
//! ```text
//!   Callback + Context             Arc<dyn Listener>
//!   (closure, bound receiver)      (object is its own receiver)
//!          │                                │
//!          └────► EventBus::on ◄── subscribe┘
//!                      │
//!                 Registration { callback, context }
//! ```
//!
//! ## Contents
//! - [`Callback`] shared closure handle with identity (used by `off`)
//! - [`Context`] receiver bound at registration time
//! - [`Listener`] trait for object-style listeners
//! - `LogListener` built-in listener that logs through `tracing` (feature `logging`)

mod callback;
mod listener;
#[cfg(feature = "logging")]
mod log;

pub use callback::{Callback, Context, ListenerResult};
pub(crate) use listener::listener_callback;
pub use listener::{Listener, ListenerRef};
#[cfg(feature = "logging")]
pub use log::LogListener;

//! # Listener trait.
//!
//! Provides [`Listener`], an object-style alternative to closures: the
//! listener itself is the bound context. Register one with
//! [`EventBus::subscribe`](crate::EventBus::subscribe), which returns the
//! [`Callback`] handle needed to unregister it later.
//!
//! ## Rules
//! - Invoked synchronously on the thread calling `emit`, in registration order.
//! - Returning an error stops the dispatch under the default failure policy.
//! - The same listener may be subscribed several times, under one or more names.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use eventbus::{EventBus, Listener, ListenerError, Payload};
//!
//! struct Audit;
//!
//! impl Listener for Audit {
//!     fn on_event(&self, event: &str, payload: &Payload) -> Result<(), ListenerError> {
//!         let _ = (event, payload.len()); // write an audit record, etc.
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &'static str { "audit" }
//! }
//!
//! let bus = EventBus::new();
//! let handle = bus.subscribe("login", Arc::new(Audit));
//! assert_eq!(handle.name(), "audit");
//! assert_eq!(bus.listener_count("login"), 1);
//! ```

use std::sync::Arc;

use super::callback::{Callback, ListenerResult};
use crate::events::Payload;

/// Event listener with its own receiver state.
pub trait Listener: Send + Sync + 'static {
    /// Handles one announcement of `event`.
    fn on_event(&self, event: &str, payload: &Payload) -> ListenerResult;

    /// Returns the listener name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Shared handle to a listener.
pub type ListenerRef = Arc<dyn Listener>;

/// Builds the callback that forwards `event` announcements to `listener`.
///
/// The listener travels as the registration's context, so the callback stays
/// free of captured state apart from the event name.
pub(crate) fn listener_callback(event: &str, name: &'static str) -> Callback {
    let event = event.to_owned();
    Callback::method(move |listener: &ListenerRef, payload: &Payload| {
        listener.on_event(&event, payload)
    })
    .with_name(name)
}

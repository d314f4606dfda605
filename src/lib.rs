//! # eventbus
//!
//! **eventbus** is a small, synchronous publish/subscribe hub for Rust.
//!
//! Parts of an application register interest in named events; other parts
//! announce those events with arbitrary payloads. Neither side holds a
//! reference to the other, only to the bus.
//!
//! ## Architecture
//! ```text
//!   subscriber A          subscriber B            publisher
//!        │ on("save", cb, ctx)  │ subscribe("save", l)   │ emit("save", payload)
//!        ▼                      ▼                        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  EventBus                                                         │
//! │  - Registry: "save" ─► Arc<[Registration]> (immutable snapshot)   │
//! │  - BusConfig: FailurePolicy, capacity hint, dispatch tracing      │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                │ emit takes a snapshot, releases the lock
//!                                ▼
//!             cb(ctx, &payload) ──► l.on_event("save", &payload) ──► ...
//!             (registration order, on the caller's thread)
//! ```
//!
//! ## Features
//! | Area              | Description                                                     | Key types / traits                      |
//! |-------------------|-----------------------------------------------------------------|-----------------------------------------|
//! | **Bus**           | Register, announce, unregister; introspection.                  | [`EventBus`], [`EventBusBuilder`]       |
//! | **Listeners**     | Closures with a bound receiver, or listener objects.            | [`Callback`], [`Context`], [`Listener`] |
//! | **Payloads**      | Untyped argument lists and compile-time typed events.           | [`Payload`], [`Event`]                  |
//! | **Policies**      | Propagate the first failure, or isolate listeners.              | [`FailurePolicy`]                       |
//! | **Errors**        | Typed errors for listeners and dispatch.                        | [`ListenerError`], [`EmitError`]        |
//! | **Configuration** | Per-bus settings.                                               | [`BusConfig`]                           |
//! | **Shared handle** | Process-wide instance.                                          | [`global`]                              |
//!
//! ## Optional features
//! - `logging`: exports a built-in `LogListener` that records events through `tracing`
//!   _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use eventbus::{Callback, Context, EventBus, Payload};
//!
//! struct Editor { name: &'static str }
//!
//! let bus = EventBus::new();
//! let editor = Arc::new(Editor { name: "main" });
//!
//! let on_save = Callback::method(|ed: &Editor, p: &Payload| {
//!     let id = p.require::<u32>(0)?;
//!     println!("{} saved document {id}", ed.name);
//!     Ok(())
//! });
//!
//! bus.on("save", on_save.clone(), Context::from_arc(editor));
//! bus.emit("save", Payload::single(42u32))?;
//! bus.off("save", &on_save);
//! assert!(!bus.has_listeners("save"));
//! # Ok::<(), eventbus::EmitError>(())
//! ```
mod core;
mod error;
mod events;
mod listeners;
mod policies;

// ---- Public re-exports ----

pub use self::core::global;
pub use self::core::{BusConfig, EventBus, EventBusBuilder, Registration};
pub use error::{BusError, EmitError, ListenerError};
pub use events::{Arg, Event, Payload};
pub use listeners::{Callback, Context, Listener, ListenerRef, ListenerResult};
pub use policies::FailurePolicy;

// Optional: expose a simple built-in logging listener (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use listeners::LogListener;

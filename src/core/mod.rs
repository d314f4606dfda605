//! Bus core: registry, dispatch and the shared handle.
//!
//! Internal modules:
//! - [`bus`]: the [`EventBus`] itself (`on` / `emit` / `off` and introspection);
//! - [`registry`]: event name → immutable registration snapshots;
//! - [`config`]: [`BusConfig`] settings;
//! - [`builder`]: [`EventBusBuilder`] with preregistered listeners;
//! - [`global`]: process-wide instance.

mod builder;
mod bus;
mod config;
pub mod global;
mod registry;

pub use builder::EventBusBuilder;
pub use bus::EventBus;
pub use config::BusConfig;
pub use registry::Registration;

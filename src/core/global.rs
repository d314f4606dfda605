//! # Process-wide bus handle.
//!
//! One [`EventBus`] shared by the whole process, so a registration made in one
//! module is visible to an announcement from any other.
//!
//! ## Lifecycle
//! - Created on first use: either [`init`] (explicit configuration) or [`bus`]
//!   (default configuration), whichever runs first.
//! - Lives until the process exits; there is no teardown.
//! - [`init`] after the bus exists fails with [`BusError::AlreadyInitialized`].
//!
//! Libraries and tests should prefer an explicitly constructed `EventBus`
//! passed to their consumers; the global handle is for application wiring.
//!
//! ## Example
//! ```rust
//! use eventbus::{global, Payload};
//!
//! let cb = global::bus().on_fn("app.ready", |_| Ok(()));
//! global::bus().emit("app.ready", Payload::new()).unwrap();
//! global::bus().off("app.ready", &cb);
//! ```

use once_cell::sync::OnceCell;
use tracing::debug;

use super::bus::EventBus;
use super::config::BusConfig;
use crate::error::BusError;

static GLOBAL: OnceCell<EventBus> = OnceCell::new();

/// Creates the process-wide bus with `cfg`.
///
/// # Errors
/// [`BusError::AlreadyInitialized`] when the bus was already created, by an
/// earlier `init` or by a call to [`bus`].
pub fn init(cfg: BusConfig) -> Result<&'static EventBus, BusError> {
    GLOBAL
        .set(EventBus::with_config(cfg))
        .map_err(|_| BusError::AlreadyInitialized)?;
    debug!("global event bus initialized");
    Ok(bus())
}

/// Returns the process-wide bus, creating it with the default configuration
/// on first use.
pub fn bus() -> &'static EventBus {
    GLOBAL.get_or_init(EventBus::new)
}

/// True once the process-wide bus exists.
pub fn is_initialized() -> bool {
    GLOBAL.get().is_some()
}

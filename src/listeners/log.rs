//! # LogListener — simple event recorder
//!
//! A minimal listener that records every announcement it receives through
//! `tracing`. Use it for tests, demos or to watch traffic on a busy name.
//!
//! ## Example output (with a `fmt` subscriber installed)
//! ```text
//! INFO eventbus::listeners::log: event received event="save" args=1
//! INFO eventbus::listeners::log: event received event="quit" args=0
//! ```

use tracing::info;

use crate::events::Payload;
use crate::listeners::{Listener, ListenerResult};

/// Event-logging listener.
#[derive(Default, Debug)]
pub struct LogListener;

impl LogListener {
    /// Construct a new [`LogListener`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Listener for LogListener {
    fn on_event(&self, event: &str, payload: &Payload) -> ListenerResult {
        info!(event = %event, args = payload.len(), "event received");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "LogListener"
    }
}

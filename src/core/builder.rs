use crate::{
    core::BusConfig,
    listeners::{Callback, Context, ListenerRef},
    policies::FailurePolicy,
};
use super::bus::EventBus;

/// Pending registration collected by the builder.
enum Pending {
    Callback(String, Callback, Context),
    Listener(String, ListenerRef),
}

/// Builder for constructing an [`EventBus`] with preregistered listeners.
#[derive(Default)]
pub struct EventBusBuilder {
    cfg: BusConfig,
    pending: Vec<Pending>,
}

impl EventBusBuilder {
    /// Creates a new builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, cfg: BusConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets only the failure policy.
    pub fn with_failure_policy(mut self, failure: FailurePolicy) -> Self {
        self.cfg.failure = failure;
        self
    }

    /// Queues an object-style listener for `event`.
    pub fn with_listener(mut self, event: impl Into<String>, listener: ListenerRef) -> Self {
        self.pending.push(Pending::Listener(event.into(), listener));
        self
    }

    /// Queues a callback bound to `context` for `event`.
    pub fn with_callback(
        mut self,
        event: impl Into<String>,
        callback: Callback,
        context: Context,
    ) -> Self {
        self.pending
            .push(Pending::Callback(event.into(), callback, context));
        self
    }

    /// Builds the bus and registers queued listeners in the order they were added.
    pub fn build(self) -> EventBus {
        let bus = EventBus::with_config(self.cfg);
        for pending in self.pending {
            match pending {
                Pending::Callback(event, callback, context) => bus.on(&event, callback, context),
                Pending::Listener(event, listener) => {
                    bus.subscribe(&event, listener);
                }
            }
        }
        bus
    }
}

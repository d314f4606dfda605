//! # Synchronous event bus.
//!
//! [`EventBus`] maps event names to ordered registrations and dispatches
//! announcements to them inline, on the caller's thread.
//!
//! ## Architecture
//! ```text
//! on(name, cb, ctx) ──► write lock ──► Registry: append, swap snapshot
//! off(name, cb)     ──► write lock ──► Registry: filter, swap snapshot
//!
//! emit(name, payload)
//!     ├─► read lock, clone snapshot Arc, unlock
//!     └─► for reg in snapshot (registration order):
//!            reg.callback(reg.context, &payload)
//!              ├─ Ok  ──► next
//!              └─ Err ──► FailurePolicy::Propagate → return EmitError (rest skipped)
//!                         FailurePolicy::Isolate   → warn!, next (Fatal still stops)
//! ```
//!
//! ## Rules
//! - **No lock during dispatch**: listeners may call `on`, `off` or `emit` on the same bus.
//! - **Snapshot dispatch**: registrations added or removed by a listener do not affect
//!   the dispatch already in flight; they apply from the next `emit`.
//! - **Unknown names**: `emit` on a name nobody registered is a silent no-op.
//! - **No lock during drop**: registrations removed by `off`, `remove_event` or `clear`
//!   are dropped after the lock is released, so a context's `Drop` may use the bus.
//! - **`on` / `off` never fail.**

use std::panic::{catch_unwind, AssertUnwindSafe};

use parking_lot::RwLock;
use tracing::{trace, warn};

use super::builder::EventBusBuilder;
use super::config::BusConfig;
use super::registry::{Registration, Registry};
use crate::error::{EmitError, ListenerError};
use crate::events::{Event, Payload};
use crate::listeners::{listener_callback, Callback, Context, ListenerRef, ListenerResult};

/// In-process publish/subscribe hub.
///
/// `EventBus` is `Send + Sync`; share one instance with `Arc<EventBus>`, a
/// `&'static` reference, or the process-wide handle from [`global`](crate::global).
pub struct EventBus {
    registry: RwLock<Registry>,
    cfg: BusConfig,
}

impl EventBus {
    /// Creates an empty bus with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    /// Creates an empty bus with the given configuration.
    #[must_use]
    pub fn with_config(cfg: BusConfig) -> Self {
        Self {
            registry: RwLock::new(Registry::with_capacity(cfg.capacity_hint())),
            cfg,
        }
    }

    /// Returns a builder for a bus with preregistered listeners.
    pub fn builder() -> EventBusBuilder {
        EventBusBuilder::new()
    }

    /// Returns the configuration this bus was built with.
    pub fn config(&self) -> &BusConfig {
        &self.cfg
    }

    /// Registers `callback` with `context` as receiver under `event`.
    ///
    /// Any string is a valid name, including `""`. Registering the same pair
    /// twice stores it twice, and it runs twice per `emit`.
    pub fn on(&self, event: &str, callback: Callback, context: Context) {
        let name = callback.name().to_owned();
        let count = self
            .registry
            .write()
            .insert(event, Registration::new(callback, context));
        trace!(event = %event, callback = %name, listeners = count, "listener registered");
    }

    /// Registers a context-free closure under `event` and returns its handle.
    pub fn on_fn<F>(&self, event: &str, f: F) -> Callback
    where
        F: Fn(&Payload) -> ListenerResult + Send + Sync + 'static,
    {
        let callback = Callback::from_fn(f);
        self.on(event, callback.clone(), Context::none());
        callback
    }

    /// Registers an object-style listener under `event`.
    ///
    /// The listener is bound as the registration's context. Pass the returned
    /// handle to [`off`](Self::off) to unregister it.
    pub fn subscribe(&self, event: &str, listener: ListenerRef) -> Callback {
        let callback = listener_callback(event, listener.name());
        self.on(event, callback.clone(), Context::new(listener));
        callback
    }

    /// Registers a typed listener for `E`, with `context` bound as `C`.
    pub fn on_event<E, C>(
        &self,
        context: Context,
        f: impl Fn(&C, &E::Args) -> ListenerResult + Send + Sync + 'static,
    ) -> Callback
    where
        E: Event,
        C: std::any::Any,
    {
        let callback =
            Callback::method(move |ctx: &C, payload: &Payload| f(ctx, E::args(payload)?))
                .with_name(E::NAME);
        self.on(E::NAME, callback.clone(), context);
        callback
    }

    /// Announces `event`, invoking every registered listener in registration order.
    ///
    /// The same `payload` is handed to each listener. Returns once every
    /// listener has returned.
    ///
    /// # Errors
    /// With [`FailurePolicy::Propagate`](crate::FailurePolicy::Propagate) the first
    /// listener error stops the dispatch and is returned as [`EmitError::Listener`];
    /// a panicking listener unwinds through this call. With
    /// [`FailurePolicy::Isolate`](crate::FailurePolicy::Isolate) only a
    /// [`ListenerError::Fatal`] is returned.
    pub fn emit(&self, event: &str, payload: Payload) -> Result<(), EmitError> {
        let Some(snapshot) = self.registry.read().snapshot(event) else {
            return Ok(());
        };

        if self.cfg.trace_dispatch {
            trace!(
                event = %event,
                listeners = snapshot.len(),
                args = payload.len(),
                "dispatching event"
            );
        }

        let isolate = self.cfg.failure.isolates();
        for (index, registration) in snapshot.iter().enumerate() {
            let result = if isolate {
                invoke_isolated(registration, &payload)
            } else {
                registration
                    .callback()
                    .call(registration.context(), &payload)
            };

            if let Err(source) = result {
                if isolate && !source.is_fatal() {
                    warn!(
                        event = %event,
                        listener = index,
                        callback = %registration.callback().name(),
                        error = source.as_label(),
                        reason = %source.as_message(),
                        "listener failed; continuing dispatch"
                    );
                    continue;
                }
                return Err(EmitError::Listener {
                    event: event.to_owned(),
                    index,
                    source,
                });
            }
        }
        Ok(())
    }

    /// Announces the typed event `E` with `args`.
    ///
    /// # Errors
    /// Same as [`emit`](Self::emit).
    pub fn emit_event<E: Event>(&self, args: E::Args) -> Result<(), EmitError> {
        self.emit(E::NAME, E::payload(args))
    }

    /// Removes every registration of `callback` under `event`.
    ///
    /// Registrations are matched by callback identity ([`Callback::ptr_eq`]),
    /// whatever their context. Other listeners are untouched. When `event` was
    /// never registered, an empty entry is stored for it.
    pub fn off(&self, event: &str, callback: &Callback) {
        let (removed, old) = self.registry.write().remove_callback(event, callback);
        drop(old);
        trace!(event = %event, callback = %callback.name(), removed, "listener removed");
    }

    /// Number of registrations under `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.registry.read().len_of(event)
    }

    /// True when at least one registration exists under `event`.
    pub fn has_listeners(&self, event: &str) -> bool {
        self.listener_count(event) > 0
    }

    /// True when `event` is a key of the registry, even with no registrations.
    pub fn contains(&self, event: &str) -> bool {
        self.registry.read().contains(event)
    }

    /// Names currently present in the registry, in no particular order.
    pub fn event_names(&self) -> Vec<String> {
        self.registry.read().names()
    }

    /// Drops `event` and all its registrations. Returns how many were removed.
    pub fn remove_event(&self, event: &str) -> usize {
        let old = self.registry.write().remove_event(event);
        let removed = old.as_ref().map_or(0, |s| s.len());
        drop(old);
        trace!(event = %event, removed, "event removed");
        removed
    }

    /// Removes every event and registration.
    pub fn clear(&self) {
        let old = self.registry.write().take_all();
        drop(old);
        trace!("registry cleared");
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("events", &self.registry.read().names().len())
            .field("cfg", &self.cfg)
            .finish()
    }
}

/// Runs one registration inside a failure boundary.
///
/// **Warning**: `AssertUnwindSafe` is used; a listener that panics while holding
/// a lock on shared state can leave that state inconsistent.
fn invoke_isolated(registration: &Registration, payload: &Payload) -> ListenerResult {
    match catch_unwind(AssertUnwindSafe(|| {
        registration
            .callback()
            .call(registration.context(), payload)
    })) {
        Ok(result) => result,
        Err(panic_err) => {
            let info = if let Some(msg) = panic_err.downcast_ref::<&'static str>() {
                (*msg).to_string()
            } else if let Some(msg) = panic_err.downcast_ref::<String>() {
                msg.clone()
            } else {
                "unknown panic".to_string()
            };
            Err(ListenerError::Panicked { info })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::policies::FailurePolicy;
    use parking_lot::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    fn recorder(log: &Log, tag: &'static str) -> Callback {
        let log = Arc::clone(log);
        Callback::from_fn(move |p| {
            let arg = p.get::<i32>(0).map_or("-".to_string(), |v| v.to_string());
            log.lock().push(format!("{tag}:{arg}"));
            Ok(())
        })
    }

    fn failing(tag: &'static str) -> Callback {
        Callback::from_fn(move |_| Err(ListenerError::failed(tag)))
    }

    #[test]
    fn test_emit_without_listeners_is_noop() {
        let bus = EventBus::new();
        assert!(bus.emit("nobody", Payload::single(1)).is_ok());
        assert!(!bus.contains("nobody"));
    }

    #[test]
    fn test_emit_invokes_in_registration_order_with_context() {
        #[derive(Debug, PartialEq)]
        struct Doc(&'static str);

        let bus = EventBus::new();
        let log: Log = Arc::default();

        for (tag, owner) in [("save1", "ctx1"), ("save2", "ctx2")] {
            let log = Arc::clone(&log);
            let cb = Callback::method(move |doc: &Doc, p: &Payload| {
                log.lock().push(format!("{tag}:{}:{}", doc.0, p.require::<i32>(0)?));
                Ok(())
            });
            bus.on("save", cb, Context::from_arc(Arc::new(Doc(owner))));
        }

        bus.emit("save", Payload::single(42)).unwrap();
        assert_eq!(*log.lock(), vec!["save1:ctx1:42", "save2:ctx2:42"]);
    }

    #[test]
    fn test_duplicate_registration_runs_twice() {
        let bus = EventBus::new();
        let log: Log = Arc::default();
        let cb = recorder(&log, "dup");

        bus.on("e", cb.clone(), Context::none());
        bus.on("e", cb, Context::none());
        bus.emit("e", Payload::single(1)).unwrap();

        assert_eq!(*log.lock(), vec!["dup:1", "dup:1"]);
        assert_eq!(bus.listener_count("e"), 2);
    }

    #[test]
    fn test_no_cross_event_leakage() {
        let bus = EventBus::new();
        let log: Log = Arc::default();
        bus.on("x", recorder(&log, "x"), Context::none());

        bus.emit("y", Payload::single(1)).unwrap();
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_payload_forwarded_unchanged() {
        let bus = EventBus::new();
        let seen: Arc<Mutex<Vec<usize>>> = Arc::default();
        let s = Arc::clone(&seen);
        bus.on_fn("p", move |p| {
            s.lock().push(p.len());
            if p.len() == 3 {
                assert_eq!(p.get::<&str>(1), Some(&"two"));
                assert_eq!(p.get::<Vec<u8>>(2), Some(&vec![3u8]));
            }
            Ok(())
        });

        bus.emit("p", Payload::new()).unwrap();
        bus.emit("p", Payload::new().with(1).with("two").with(vec![3u8])).unwrap();
        assert_eq!(*seen.lock(), vec![0, 3]);
    }

    #[test]
    fn test_error_aborts_remaining_listeners() {
        let bus = EventBus::new();
        let log: Log = Arc::default();
        bus.on("e", recorder(&log, "first"), Context::none());
        bus.on("e", failing("boom"), Context::none());
        bus.on("e", recorder(&log, "third"), Context::none());

        let err = bus.emit("e", Payload::single(7)).unwrap_err();

        assert_eq!(
            err,
            EmitError::Listener {
                event: "e".into(),
                index: 1,
                source: ListenerError::failed("boom"),
            }
        );
        assert_eq!(*log.lock(), vec!["first:7"]);
    }

    #[test]
    fn test_panic_propagates_by_default() {
        let bus = Arc::new(EventBus::new());
        let log: Log = Arc::default();
        bus.on_fn("e", |_| panic!("listener exploded"));
        bus.on("e", recorder(&log, "after"), Context::none());

        let b = Arc::clone(&bus);
        let res = std::panic::catch_unwind(AssertUnwindSafe(|| b.emit("e", Payload::new())));

        assert!(res.is_err());
        assert!(log.lock().is_empty());
        // the bus stays usable after the unwind
        assert_eq!(bus.listener_count("e"), 2);
    }

    #[test]
    fn test_isolate_policy_keeps_dispatching() {
        let bus = EventBus::with_config(BusConfig {
            failure: FailurePolicy::Isolate,
            ..BusConfig::default()
        });
        let log: Log = Arc::default();
        bus.on("e", failing("soft"), Context::none());
        bus.on_fn("e", |_| panic!("boom"));
        bus.on("e", recorder(&log, "last"), Context::none());

        assert!(bus.emit("e", Payload::single(3)).is_ok());
        assert_eq!(*log.lock(), vec!["last:3"]);
    }

    #[test]
    fn test_isolate_policy_stops_on_fatal() {
        let bus = EventBus::with_config(BusConfig {
            failure: FailurePolicy::Isolate,
            ..BusConfig::default()
        });
        let log: Log = Arc::default();
        bus.on_fn("e", |_| Err(ListenerError::fatal("halt")));
        bus.on("e", recorder(&log, "never"), Context::none());

        let err = bus.emit("e", Payload::new()).unwrap_err();
        assert!(err.listener_error().is_fatal());
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_isolated_panic_message_is_captured() {
        let reg = Registration::new(
            Callback::from_fn(|_| panic!("bad {}", 1)),
            Context::none(),
        );
        assert_eq!(
            invoke_isolated(&reg, &Payload::new()),
            Err(ListenerError::Panicked {
                info: "bad 1".into()
            })
        );
    }

    #[test]
    fn test_off_removes_only_that_callback() {
        let bus = EventBus::new();
        let log: Log = Arc::default();
        let f = recorder(&log, "f");
        let g = recorder(&log, "g");
        bus.on("e", f.clone(), Context::none());
        bus.on("e", g, Context::none());

        bus.off("e", &f);
        bus.emit("e", Payload::single(1)).unwrap();

        assert_eq!(*log.lock(), vec!["g:1"]);
    }

    #[test]
    fn test_off_uses_identity_not_shape() {
        let bus = EventBus::new();
        let log: Log = Arc::default();
        bus.on("e", recorder(&log, "a"), Context::none());

        bus.off("e", &recorder(&log, "a"));
        assert_eq!(bus.listener_count("e"), 1);
    }

    #[test]
    fn test_off_unknown_event_creates_empty_key() {
        let bus = EventBus::new();
        bus.off("never", &Callback::from_fn(|_| Ok(())));

        assert!(bus.contains("never"));
        assert!(!bus.has_listeners("never"));
        assert!(bus.emit("never", Payload::new()).is_ok());
    }

    #[test]
    fn test_empty_event_name_is_valid() {
        let bus = EventBus::new();
        let log: Log = Arc::default();
        bus.on("", recorder(&log, "blank"), Context::none());

        bus.emit("", Payload::new()).unwrap();
        assert_eq!(*log.lock(), vec!["blank:-"]);
    }

    #[test]
    fn test_reentrant_registration_applies_to_next_emit() {
        let bus = Arc::new(EventBus::new());
        let log: Log = Arc::default();

        let weak = Arc::downgrade(&bus);
        let late = recorder(&log, "late");
        bus.on_fn("e", move |_| {
            if let Some(bus) = weak.upgrade() {
                bus.on("e", late.clone(), Context::none());
            }
            Ok(())
        });

        bus.emit("e", Payload::single(1)).unwrap();
        assert!(log.lock().is_empty(), "snapshot must not see new listener");

        bus.emit("e", Payload::single(2)).unwrap();
        assert_eq!(*log.lock(), vec!["late:2"]);
    }

    #[test]
    fn test_reentrant_off_does_not_skip_inflight_listeners() {
        let bus = Arc::new(EventBus::new());
        let log: Log = Arc::default();
        let second = recorder(&log, "second");

        let weak = Arc::downgrade(&bus);
        let victim = second.clone();
        bus.on_fn("e", move |_| {
            if let Some(bus) = weak.upgrade() {
                bus.off("e", &victim);
            }
            Ok(())
        });
        bus.on("e", second, Context::none());

        bus.emit("e", Payload::single(1)).unwrap();
        bus.emit("e", Payload::single(2)).unwrap();

        assert_eq!(*log.lock(), vec!["second:1"]);
    }

    #[test]
    fn test_reentrant_emit() {
        let bus = Arc::new(EventBus::new());
        let log: Log = Arc::default();
        bus.on("inner", recorder(&log, "inner"), Context::none());

        let weak = Arc::downgrade(&bus);
        bus.on_fn("outer", move |p| {
            let bus = weak.upgrade().ok_or_else(|| ListenerError::fatal("bus gone"))?;
            bus.emit("inner", p.clone())
                .map_err(|e| ListenerError::failed(e.to_string()))
        });

        bus.emit("outer", Payload::single(5)).unwrap();
        assert_eq!(*log.lock(), vec!["inner:5"]);
    }

    #[test]
    fn test_typed_events() {
        struct Saved;
        impl Event for Saved {
            const NAME: &'static str = "save";
            type Args = (u64, String);
        }

        let bus = EventBus::new();
        let log: Log = Arc::default();
        let l = Arc::clone(&log);
        let owner = Context::new("owner".to_string());
        let cb = bus.on_event::<Saved, String>(owner, move |who, args: &(u64, String)| {
            let (id, path) = args;
            l.lock().push(format!("{who}:{id}:{path}"));
            Ok(())
        });
        // untyped listeners on the same name see the typed payload
        bus.on_fn("save", |p| {
            assert_eq!(p.len(), 1);
            Ok(())
        });

        bus.emit_event::<Saved>((9, "/a".into())).unwrap();
        assert_eq!(*log.lock(), vec!["owner:9:/a"]);
        assert_eq!(cb.name(), "save");

        let err = bus.emit("save", Payload::single("wrong")).unwrap_err();
        assert!(matches!(
            err.listener_error(),
            ListenerError::PayloadMismatch { index: 0, .. }
        ));
    }

    #[test]
    fn test_subscribe_and_off_listener() {
        use crate::listeners::Listener;

        struct Counter(Mutex<u32>);
        impl Listener for Counter {
            fn on_event(&self, event: &str, _: &Payload) -> ListenerResult {
                assert_eq!(event, "tick");
                *self.0.lock() += 1;
                Ok(())
            }
            fn name(&self) -> &'static str {
                "counter"
            }
        }

        let bus = EventBus::new();
        let counter = Arc::new(Counter(Mutex::new(0)));
        let handle = bus.subscribe("tick", counter.clone());

        bus.emit("tick", Payload::new()).unwrap();
        bus.off("tick", &handle);
        bus.emit("tick", Payload::new()).unwrap();

        assert_eq!(*counter.0.lock(), 1);
        assert_eq!(handle.name(), "counter");
    }

    #[test]
    fn test_introspection() {
        let bus = EventBus::with_config(BusConfig {
            initial_capacity: 8,
            ..BusConfig::default()
        });
        bus.on_fn("a", |_| Ok(()));
        bus.on_fn("a", |_| Ok(()));
        bus.on_fn("b", |_| Ok(()));

        let mut names = bus.event_names();
        names.sort();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(bus.listener_count("a"), 2);
        assert_eq!(bus.remove_event("a"), 2);
        assert!(!bus.contains("a"));

        bus.clear();
        assert!(bus.event_names().is_empty());
    }

    #[test]
    fn test_concurrent_registration_from_threads() {
        let bus = Arc::new(EventBus::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let bus = Arc::clone(&bus);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        bus.on_fn("shared", |_| Ok(()));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(bus.listener_count("shared"), 100);
    }

    /// Context whose drop queries the bus it was registered on.
    struct DropProbe {
        bus: std::sync::Weak<EventBus>,
        seen: Arc<Mutex<Option<usize>>>,
    }

    impl Drop for DropProbe {
        fn drop(&mut self) {
            if let Some(bus) = self.bus.upgrade() {
                *self.seen.lock() = Some(bus.listener_count("other"));
            }
        }
    }

    fn run_with_timeout(f: impl FnOnce() + Send + 'static) {
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            f();
            let _ = tx.send(());
        });
        rx.recv_timeout(std::time::Duration::from_secs(3))
            .expect("bus deadlocked while dropping a removed context");
    }

    fn register_drop_context(bus: &Arc<EventBus>, seen: &Arc<Mutex<Option<usize>>>) -> Callback {
        let ctx = Context::new(DropProbe {
            bus: Arc::downgrade(bus),
            seen: Arc::clone(seen),
        });
        let cb = Callback::from_fn(|_| Ok(()));
        bus.on("e", cb.clone(), ctx);
        bus.on_fn("other", |_| Ok(()));
        cb
    }

    #[test]
    fn test_off_drops_context_outside_lock() {
        let seen: Arc<Mutex<Option<usize>>> = Arc::default();
        let s = Arc::clone(&seen);
        run_with_timeout(move || {
            let bus = Arc::new(EventBus::new());
            let cb = register_drop_context(&bus, &s);
            bus.off("e", &cb);
        });
        assert_eq!(*seen.lock(), Some(1));
    }

    #[test]
    fn test_remove_event_drops_context_outside_lock() {
        let seen: Arc<Mutex<Option<usize>>> = Arc::default();
        let s = Arc::clone(&seen);
        run_with_timeout(move || {
            let bus = Arc::new(EventBus::new());
            register_drop_context(&bus, &s);
            assert_eq!(bus.remove_event("e"), 1);
        });
        assert_eq!(*seen.lock(), Some(1));
    }

    #[test]
    fn test_clear_drops_contexts_outside_lock() {
        let seen: Arc<Mutex<Option<usize>>> = Arc::default();
        let s = Arc::clone(&seen);
        run_with_timeout(move || {
            let bus = Arc::new(EventBus::new());
            register_drop_context(&bus, &s);
            bus.clear();
        });
        assert_eq!(*seen.lock(), Some(0));
    }
}

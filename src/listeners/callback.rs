//! # Callbacks and bound contexts.
//!
//! A registration pairs a [`Callback`] with a [`Context`]. The context is the
//! receiver handed to the callback on every invocation, so a callback written
//! against some owning object sees that object without capturing it.
//!
//! ## Identity
//! `Callback` is a cheap, cloneable handle over a shared closure. Clones share
//! identity: [`EventBus::off`](crate::EventBus::off) removes every registration
//! whose callback is [`Callback::ptr_eq`] to the one passed in. Two callbacks
//! built from identical closures are **different** callbacks.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use eventbus::{Callback, Context, EventBus, Payload};
//!
//! struct Counter { hits: AtomicU32 }
//!
//! let bus = EventBus::new();
//! let counter = std::sync::Arc::new(Counter { hits: AtomicU32::new(0) });
//!
//! let bump = Callback::method(|c: &Counter, _p: &Payload| {
//!     c.hits.fetch_add(1, Ordering::Relaxed);
//!     Ok(())
//! });
//! bus.on("tick", bump.clone(), Context::from_arc(counter.clone()));
//!
//! bus.emit("tick", Payload::new()).unwrap();
//! bus.off("tick", &bump);
//! bus.emit("tick", Payload::new()).unwrap();
//!
//! assert_eq!(counter.hits.load(Ordering::Relaxed), 1);
//! ```

use std::any::{type_name, Any};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::error::ListenerError;
use crate::events::Payload;

/// Result returned by every callback.
pub type ListenerResult = Result<(), ListenerError>;

type CallbackFn = dyn Fn(&Context, &Payload) -> ListenerResult + Send + Sync;

/// Receiver bound to a registration.
///
/// The empty context ([`Context::none`]) downcasts to `()` so context-free
/// method callbacks (`Callback::method::<(), _>`) still work.
#[derive(Clone, Default)]
pub struct Context {
    inner: Option<Arc<dyn Any + Send + Sync>>,
}

impl Context {
    /// The empty context.
    #[must_use]
    pub fn none() -> Self {
        Self { inner: None }
    }

    /// Wraps an owned value.
    #[must_use]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Binds an already shared object, keeping the caller's handle to it alive and valid.
    #[must_use]
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        let value: Arc<dyn Any + Send + Sync> = value;
        Self { inner: Some(value) }
    }

    /// True for the empty context.
    pub fn is_none(&self) -> bool {
        self.inner.is_none()
    }

    /// Borrows the bound object as a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match &self.inner {
            Some(value) => value.downcast_ref::<T>(),
            None => (&() as &dyn Any).downcast_ref::<T>(),
        }
    }

    /// Returns a shared handle to the bound object as a `T`.
    pub fn downcast_arc<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.inner.clone()?.downcast::<T>().ok()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("bound", &self.inner.is_some())
            .finish()
    }
}

/// Shared, identity-carrying callback.
#[derive(Clone)]
pub struct Callback {
    name: Cow<'static, str>,
    f: Arc<CallbackFn>,
}

impl Callback {
    /// Creates a callback that receives the bound context and the payload.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Context, &Payload) -> ListenerResult + Send + Sync + 'static,
    {
        Self {
            name: Cow::Borrowed("callback"),
            f: Arc::new(f),
        }
    }

    /// Creates a callback that ignores its context.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Payload) -> ListenerResult + Send + Sync + 'static,
    {
        Self::new(move |_ctx, payload| f(payload))
    }

    /// Creates a method-style callback: the context is downcast to `C` and
    /// passed as the receiver.
    ///
    /// A context of another type fails the invocation with
    /// [`ListenerError::ContextMismatch`].
    pub fn method<C, F>(f: F) -> Self
    where
        C: Any,
        F: Fn(&C, &Payload) -> ListenerResult + Send + Sync + 'static,
    {
        Self::new(move |ctx, payload| {
            let receiver = ctx
                .downcast_ref::<C>()
                .ok_or(ListenerError::ContextMismatch {
                    expected: type_name::<C>(),
                })?;
            f(receiver, payload)
        })
    }

    /// Attaches a name used in logs. Identity is unchanged.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the callback name used in logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when both handles refer to the same underlying closure.
    pub fn ptr_eq(&self, other: &Callback) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.f), Arc::as_ptr(&other.f))
    }

    /// Invokes the callback with `context` as receiver.
    pub fn call(&self, context: &Context, payload: &Payload) -> ListenerResult {
        (self.f)(context, payload)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback").field("name", &self.name).finish()
    }
}

//! # Untyped event payload.
//!
//! [`Payload`] is the argument list forwarded to every listener of an event.
//! It holds zero or more values of arbitrary types, in order. The bus never
//! inspects it; listeners pick arguments out with [`Payload::get`] or
//! [`Payload::require`].
//!
//! ## Example
//! ```rust
//! use eventbus::Payload;
//!
//! let p = Payload::new().with(42u32).with("saved");
//!
//! assert_eq!(p.len(), 2);
//! assert_eq!(p.get::<u32>(0), Some(&42));
//! assert_eq!(p.get::<&str>(1), Some(&"saved"));
//! assert!(p.get::<String>(1).is_none());
//! ```

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

use crate::error::ListenerError;

/// A single payload argument.
pub type Arg = Arc<dyn Any + Send + Sync>;

/// Ordered list of arguments passed verbatim to listeners.
///
/// Cloning is cheap: arguments are reference-counted, not copied.
#[derive(Clone, Default)]
pub struct Payload {
    args: Vec<Arg>,
}

impl Payload {
    /// Creates an empty payload (zero arguments).
    #[must_use]
    pub fn new() -> Self {
        Self { args: Vec::new() }
    }

    /// Creates a payload holding exactly one argument.
    #[must_use]
    pub fn single<T: Any + Send + Sync>(value: T) -> Self {
        Self::new().with(value)
    }

    /// Appends an argument, builder style.
    #[must_use]
    pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.push(value);
        self
    }

    /// Appends an argument.
    pub fn push<T: Any + Send + Sync>(&mut self, value: T) {
        self.args.push(Arc::new(value));
    }

    /// Appends an already shared argument without re-wrapping it.
    pub fn push_arg(&mut self, arg: Arg) {
        self.args.push(arg);
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// True when the payload carries no arguments.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Returns argument `index` if it exists and is a `T`.
    pub fn get<T: Any>(&self, index: usize) -> Option<&T> {
        self.args.get(index)?.downcast_ref::<T>()
    }

    /// Like [`get`](Self::get), but reports a [`ListenerError::PayloadMismatch`]
    /// so callbacks can use `?`.
    pub fn require<T: Any>(&self, index: usize) -> Result<&T, ListenerError> {
        self.get::<T>(index).ok_or(ListenerError::PayloadMismatch {
            index,
            expected: type_name::<T>(),
        })
    }

    /// Returns the shared handle of argument `index`.
    pub fn arg(&self, index: usize) -> Option<&Arg> {
        self.args.get(index)
    }

    /// Iterates over the raw arguments in order.
    pub fn iter(&self) -> impl Iterator<Item = &Arg> {
        self.args.iter()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload").field("len", &self.args.len()).finish()
    }
}

impl FromIterator<Arg> for Payload {
    fn from_iter<I: IntoIterator<Item = Arg>>(iter: I) -> Self {
        Self {
            args: iter.into_iter().collect(),
        }
    }
}

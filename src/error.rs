//! Error types used by the event bus and its listeners.
//!
//! This module defines three enums:
//!
//! - [`ListenerError`] — failures raised by an individual listener invocation.
//! - [`EmitError`] — a listener failure surfaced to the caller of `emit`.
//! - [`BusError`] — misuse of the process-wide bus handle.
//!
//! All types provide `as_label` (stable, snake_case) and `as_message` helpers for logs.

use thiserror::Error;

/// # Errors produced by a listener.
///
/// Returned from a callback to abort the current dispatch (with
/// [`FailurePolicy::Propagate`](crate::FailurePolicy::Propagate)) or to be logged
/// and skipped (with [`FailurePolicy::Isolate`](crate::FailurePolicy::Isolate)).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListenerError {
    /// Listener failed while handling the event.
    #[error("listener failed: {reason}")]
    Failed {
        /// Human-readable failure reason.
        reason: String,
    },

    /// Listener hit a non-recoverable condition.
    #[error("fatal listener error: {reason}")]
    Fatal {
        /// Human-readable failure reason.
        reason: String,
    },

    /// The bound context was not of the type the callback expects.
    #[error("context is not a `{expected}`")]
    ContextMismatch {
        /// Type name the callback asked for.
        expected: &'static str,
    },

    /// A payload argument was missing or of an unexpected type.
    #[error("payload argument #{index} is not a `{expected}`")]
    PayloadMismatch {
        /// Position of the argument in the payload.
        index: usize,
        /// Type name the callback asked for.
        expected: &'static str,
    },

    /// Listener panicked; only produced under `FailurePolicy::Isolate`.
    #[error("listener panicked: {info}")]
    Panicked {
        /// Panic message, if it was a string.
        info: String,
    },
}

impl ListenerError {
    /// Shorthand for [`ListenerError::Failed`].
    pub fn failed(reason: impl Into<String>) -> Self {
        ListenerError::Failed {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`ListenerError::Fatal`].
    pub fn fatal(reason: impl Into<String>) -> Self {
        ListenerError::Fatal {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use eventbus::ListenerError;
    ///
    /// assert_eq!(ListenerError::failed("boom").as_label(), "listener_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ListenerError::Failed { .. } => "listener_failed",
            ListenerError::Fatal { .. } => "listener_fatal",
            ListenerError::ContextMismatch { .. } => "listener_context_mismatch",
            ListenerError::PayloadMismatch { .. } => "listener_payload_mismatch",
            ListenerError::Panicked { .. } => "listener_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ListenerError::Failed { reason } => format!("error: {reason}"),
            ListenerError::Fatal { reason } => format!("fatal: {reason}"),
            ListenerError::ContextMismatch { expected } => {
                format!("context mismatch: expected {expected}")
            }
            ListenerError::PayloadMismatch { index, expected } => {
                format!("payload mismatch at #{index}: expected {expected}")
            }
            ListenerError::Panicked { info } => format!("panic: {info}"),
        }
    }

    /// Indicates whether the listener reported a fatal condition.
    ///
    /// Under `FailurePolicy::Isolate` a fatal error still stops the dispatch.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ListenerError::Fatal { .. })
    }
}

/// # Errors produced by `emit`.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmitError {
    /// A listener failed; listeners registered after it were not invoked.
    #[error("listener #{index} for event {event:?} failed: {source}")]
    Listener {
        /// Event being dispatched.
        event: String,
        /// Position of the failing registration in dispatch order.
        index: usize,
        /// The listener's error.
        #[source]
        source: ListenerError,
    },
}

impl EmitError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            EmitError::Listener { .. } => "emit_listener_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            EmitError::Listener {
                event,
                index,
                source,
            } => format!("event={event:?} listener=#{index} {}", source.as_message()),
        }
    }

    /// Returns the underlying listener error.
    pub fn listener_error(&self) -> &ListenerError {
        match self {
            EmitError::Listener { source, .. } => source,
        }
    }
}

/// # Errors produced by the process-wide bus handle.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    /// `global::init` was called after the shared bus already existed.
    #[error("global event bus is already initialized")]
    AlreadyInitialized,
}

impl BusError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            BusError::AlreadyInitialized => "bus_already_initialized",
        }
    }
}

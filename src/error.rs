//! Error types used by the emitter and its listeners.
//!
//! This module defines two types:
//!
//! - [`EmitterError`]: errors returned by emitter operations (subscription
//!   validation, unhandled `error` events, deferred emission outcomes).
//! - [`ListenerError`]: the error value a listener fails with; it is what
//!   `error` listeners receive as their first argument.
//!
//! [`EmitterError`] provides helper methods (`as_label`, `as_message`) for
//! logging, in the same manner across every variant.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::events::EventType;

/// Message used when `error` is emitted without listeners and without an error value.
pub(crate) const UNSPECIFIED_ERROR: &str = "Uncaught, unspecified 'error' event.";

/// # Errors produced by emitter operations.
///
/// Subscription-time variants (`InvalidListener`, `InvalidArgument`) are
/// returned immediately to the caller. Dispatch-time variants surface only
/// after every sibling listener of the failing dispatch has run.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum EmitterError {
    /// A value expected to be a [`Listener`](crate::Listener) is something else.
    #[error("listener must be callable, got {found}")]
    InvalidListener {
        /// Short description of what was supplied instead.
        found: &'static str,
    },

    /// A numeric or positional argument violates its constraint.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending parameter.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The reserved `error` type was emitted while no `error` listener was registered.
    #[error("unhandled error event: {source}")]
    Unhandled {
        /// The emitted error value, or a generic one when none was supplied.
        source: ListenerError,
    },

    /// An `error` listener failed while handling a redirected listener failure.
    ///
    /// Redirected `error` dispatch is not itself guarded, so this propagates
    /// out of the `emit` call that triggered the original failure.
    #[error("error listener failed: {source}")]
    ErrorListener {
        /// The failure raised by the `error` listener.
        source: ListenerError,
    },

    /// A deferred emission ran but no listener was invoked.
    #[error("no listeners for `{event}`")]
    NoListeners {
        /// The emitted event type.
        event: EventType,
    },

    /// A deferred emission was requested outside of an async runtime.
    #[error("no async runtime available to schedule `{event}`")]
    NoRuntime {
        /// The event type that could not be scheduled.
        event: EventType,
    },

    /// The runtime task carrying a deferred emission was cancelled or panicked.
    #[error("deferred emission of `{event}` aborted")]
    TickAborted {
        /// The event type of the aborted emission.
        event: EventType,
    },

    /// A mixin selection or call names an operation that does not exist.
    #[error("unknown operation `{name}`")]
    UnknownOperation {
        /// The requested operation name.
        name: String,
    },
}

impl EmitterError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use nsemitter::EmitterError;
    ///
    /// let err = EmitterError::InvalidListener { found: "i32" };
    /// assert_eq!(err.as_label(), "emitter_invalid_listener");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            EmitterError::InvalidListener { .. } => "emitter_invalid_listener",
            EmitterError::InvalidArgument { .. } => "emitter_invalid_argument",
            EmitterError::Unhandled { .. } => "emitter_unhandled_error",
            EmitterError::ErrorListener { .. } => "emitter_error_listener_failed",
            EmitterError::NoListeners { .. } => "emitter_no_listeners",
            EmitterError::NoRuntime { .. } => "emitter_no_runtime",
            EmitterError::TickAborted { .. } => "emitter_tick_aborted",
            EmitterError::UnknownOperation { .. } => "emitter_unknown_operation",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            EmitterError::InvalidListener { found } => format!("not a listener: {found}"),
            EmitterError::InvalidArgument { name, reason } => format!("{name}: {reason}"),
            EmitterError::Unhandled { source } => format!("unhandled: {source}"),
            EmitterError::ErrorListener { source } => format!("error listener: {source}"),
            EmitterError::NoListeners { event } => format!("no listeners: {event}"),
            EmitterError::NoRuntime { event } => format!("no runtime: {event}"),
            EmitterError::TickAborted { event } => format!("aborted: {event}"),
            EmitterError::UnknownOperation { name } => format!("unknown operation: {name}"),
        }
    }

    /// Returns the carried [`ListenerError`] for `Unhandled` and `ErrorListener`.
    pub fn listener_error(&self) -> Option<&ListenerError> {
        match self {
            EmitterError::Unhandled { source } | EmitterError::ErrorListener { source } => {
                Some(source)
            }
            _ => None,
        }
    }

    pub(crate) fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        EmitterError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

/// # Error value raised by a listener.
///
/// Cheap to clone: the underlying error is shared behind an `Arc`, so the
/// same value can be handed to several `error` listeners and still compared
/// by identity with [`ListenerError::ptr_eq`].
///
/// Listeners returning `Result<_, E>` need `E: Into<ListenerError>`; use
/// [`ListenerError::new`] for arbitrary error types.
#[derive(Clone)]
pub struct ListenerError {
    inner: Arc<dyn std::error::Error + Send + Sync + 'static>,
}

impl ListenerError {
    /// Wraps any error type.
    pub fn new<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(err),
        }
    }

    /// Creates an error from a plain message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(Message(message.into()))
    }

    /// Converts a caught panic payload into an error value.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let info = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unknown panic".to_string()
        };
        Self::new(Panicked(info))
    }

    /// True if this error was produced by catching a listener panic.
    pub fn is_panic(&self) -> bool {
        self.inner.is::<Panicked>()
    }

    /// True if both values share the same underlying error.
    pub fn ptr_eq(&self, other: &ListenerError) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Attempts to view the underlying error as a concrete type.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        self.inner.downcast_ref::<E>()
    }
}

impl fmt::Debug for ListenerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ListenerError").field(&self.inner).finish()
    }
}

impl fmt::Display for ListenerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl std::error::Error for ListenerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

impl From<&str> for ListenerError {
    fn from(message: &str) -> Self {
        Self::msg(message)
    }
}

impl From<String> for ListenerError {
    fn from(message: String) -> Self {
        Self::msg(message)
    }
}

impl From<Box<dyn std::error::Error + Send + Sync + 'static>> for ListenerError {
    fn from(err: Box<dyn std::error::Error + Send + Sync + 'static>) -> Self {
        Self { inner: Arc::from(err) }
    }
}

impl From<Arc<dyn std::error::Error + Send + Sync + 'static>> for ListenerError {
    fn from(inner: Arc<dyn std::error::Error + Send + Sync + 'static>) -> Self {
        Self { inner }
    }
}

/// `Unhandled` and `ErrorListener` convert to the failure they carry;
/// other variants are wrapped.
impl From<EmitterError> for ListenerError {
    fn from(err: EmitterError) -> Self {
        match err {
            EmitterError::Unhandled { source } | EmitterError::ErrorListener { source } => source,
            other => Self::new(other),
        }
    }
}

#[derive(Debug)]
struct Message(String);

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for Message {}

#[derive(Debug)]
struct Panicked(String);

impl fmt::Display for Panicked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener panicked: {}", self.0)
    }
}

impl std::error::Error for Panicked {}

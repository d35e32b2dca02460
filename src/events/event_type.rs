//! # Event type keys.
//!
//! An [`EventType`] is either a named type or the distinguished
//! [`WILDCARD`] token that matches every emission.
//!
//! Named types may be namespaced with `:`. Emitting `a:b:c` dispatches to
//! each level returned by [`EventType::levels`], most specific first:
//! ```text
//! "a:b:c"  ──►  "a:b:c"  ──►  "a:b"  ──►  "a"  ──►  WILDCARD
//! ```
//!
//! ## Reserved types
//! - [`ERROR`] receives listener failures and must be observed (see `emit`).
//! - [`ON`], [`OFF`], [`MAX_LISTENERS`], [`DESTROY`] are meta-events fired by
//!   the emitter itself.

use std::fmt;
use std::sync::Arc;

/// Type receiving listener failures.
pub const ERROR: &str = "error";
/// Meta-event fired before a listener is added: `(EventType, Listener)`.
pub const ON: &str = ":on";
/// Meta-event fired after a listener is removed: `(EventType, Listener)`.
pub const OFF: &str = ":off";
/// Meta-event fired once when a type first exceeds the max-listeners threshold.
pub const MAX_LISTENERS: &str = ":maxListeners";
/// Meta-event fired by `destroy()` before the registry is cleared.
pub const DESTROY: &str = ":destroy";

/// The token that subscribes to every event type.
pub const WILDCARD: EventType = EventType::Wildcard;

/// Key under which listeners are registered.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventType {
    /// A named, optionally `:`-namespaced type.
    Named(Arc<str>),
    /// Every event type; dispatched after all named levels.
    Wildcard,
}

impl EventType {
    /// Creates a named event type.
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        EventType::Named(name.into())
    }

    /// The reserved `error` type.
    pub fn error() -> Self {
        EventType::named(ERROR)
    }

    /// Returns the name, or `None` for the wildcard.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            EventType::Named(name) => Some(&**name),
            EventType::Wildcard => None,
        }
    }

    #[inline]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, EventType::Wildcard)
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.as_str() == Some(ERROR)
    }

    /// Namespace levels of a named type, most specific first.
    ///
    /// Truncation happens at the last remaining `:` as long as the prefix
    /// before it is non-empty, so `":on"` has the single level `":on"`.
    /// The wildcard has no levels.
    ///
    /// # Example
    /// ```
    /// use nsemitter::EventType;
    ///
    /// let levels: Vec<_> = EventType::from("a:b:c").levels().collect();
    /// assert_eq!(levels, vec![
    ///     EventType::from("a:b:c"),
    ///     EventType::from("a:b"),
    ///     EventType::from("a"),
    /// ]);
    /// ```
    pub fn levels(&self) -> Levels<'_> {
        match self {
            EventType::Named(name) => Levels {
                full: Some(self),
                rest: truncate(name),
            },
            EventType::Wildcard => Levels {
                full: None,
                rest: None,
            },
        }
    }
}

fn truncate(name: &str) -> Option<&str> {
    match name.rfind(':') {
        Some(i) if i > 0 => Some(&name[..i]),
        _ => None,
    }
}

/// Iterator returned by [`EventType::levels`].
#[derive(Debug, Clone)]
pub struct Levels<'a> {
    full: Option<&'a EventType>,
    rest: Option<&'a str>,
}

impl Iterator for Levels<'_> {
    type Item = EventType;

    fn next(&mut self) -> Option<EventType> {
        if let Some(full) = self.full.take() {
            return Some(full.clone());
        }
        let level = self.rest?;
        self.rest = truncate(level);
        Some(EventType::named(level))
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Named(name) => f.write_str(name),
            EventType::Wildcard => f.write_str("*"),
        }
    }
}

impl From<&str> for EventType {
    fn from(name: &str) -> Self {
        EventType::named(name)
    }
}

impl From<String> for EventType {
    fn from(name: String) -> Self {
        EventType::named(name)
    }
}

impl From<Arc<str>> for EventType {
    fn from(name: Arc<str>) -> Self {
        EventType::Named(name)
    }
}

impl From<&EventType> for EventType {
    fn from(event: &EventType) -> Self {
        event.clone()
    }
}

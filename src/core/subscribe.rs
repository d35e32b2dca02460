//! # Subscription builder.
//!
//! Every method validates its arguments, registers (possibly wrapped)
//! listeners and returns the emitter for chaining:
//!
//! ```text
//! on / on_any / on_map   persistent, appended
//! first                  persistent, prepended
//! at(i)                  persistent, inserted at index i
//! once / many(n)         removed after 1 / n invocations
//! until                  removed after the listener returns true
//! ```
//!
//! Wrappers remember the caller's listener, so `off(event, &listener)`
//! removes them and `:on`/`:off` report the caller's listener.

use std::num::NonZeroUsize;

use crate::core::emitter::Emitter;
use crate::core::registry::Position;
use crate::error::EmitterError;
use crate::events::{EventType, WILDCARD};
use crate::listeners::{Lifetime, Listener};

impl Emitter {
    /// Appends a persistent listener for `event`.
    pub fn on(&self, event: impl Into<EventType>, listener: Listener) -> Result<&Self, EmitterError> {
        self.subscribe(event.into(), listener, Position::Append, Lifetime::Persistent)
    }

    /// Appends a wildcard listener (runs for every emission, after namespaced ones).
    pub fn on_any(&self, listener: Listener) -> Result<&Self, EmitterError> {
        self.on(WILDCARD, listener)
    }

    /// Registers every listener of a type → listeners mapping with [`on`](Self::on).
    pub fn on_map<I, T>(&self, mapping: I) -> Result<&Self, EmitterError>
    where
        I: IntoIterator<Item = (T, Vec<Listener>)>,
        T: Into<EventType>,
    {
        for (event, listeners) in mapping {
            let event = event.into();
            for listener in listeners {
                self.on(event.clone(), listener)?;
            }
        }
        Ok(self)
    }

    /// Inserts a persistent listener at the front of `event`'s sequence.
    pub fn first(&self, event: impl Into<EventType>, listener: Listener) -> Result<&Self, EmitterError> {
        self.subscribe(event.into(), listener, Position::Prepend, Lifetime::Persistent)
    }

    /// Inserts a persistent listener at `index` of `event`'s sequence.
    ///
    /// # Errors
    /// [`EmitterError::InvalidArgument`] when `event` already has listeners
    /// and `index` is greater than their count.
    pub fn at(
        &self,
        event: impl Into<EventType>,
        index: usize,
        listener: Listener,
    ) -> Result<&Self, EmitterError> {
        self.subscribe(event.into(), listener, Position::Index(index), Lifetime::Persistent)
    }

    /// Registers a listener that is removed after its first invocation.
    pub fn once(&self, event: impl Into<EventType>, listener: Listener) -> Result<&Self, EmitterError> {
        self.subscribe(
            event.into(),
            listener,
            Position::Append,
            Lifetime::Times(NonZeroUsize::MIN),
        )
    }

    /// Registers a listener that is removed after `times` invocations.
    ///
    /// # Errors
    /// [`EmitterError::InvalidArgument`] when `times` is zero.
    pub fn many(
        &self,
        event: impl Into<EventType>,
        times: usize,
        listener: Listener,
    ) -> Result<&Self, EmitterError> {
        let times = NonZeroUsize::new(times)
            .ok_or_else(|| EmitterError::invalid_argument("times", "must be a positive integer"))?;
        self.subscribe(event.into(), listener, Position::Append, Lifetime::Times(times))
    }

    /// Registers a listener that is removed once it returns `true`.
    pub fn until(&self, event: impl Into<EventType>, listener: Listener) -> Result<&Self, EmitterError> {
        self.subscribe(event.into(), listener, Position::Append, Lifetime::Until)
    }

    /// Removes the most recent registration of `listener` (or of a wrapper
    /// around it) for `event`. Unknown listeners are ignored.
    pub fn off(&self, event: impl Into<EventType>, listener: &Listener) -> Result<&Self, EmitterError> {
        if self.is_destroyed() {
            return Ok(self);
        }
        let event = event.into();
        self.remove_matching(&event, |l| l.matches(listener), listener)?;
        Ok(self)
    }

    /// Removes a wildcard listener.
    pub fn off_any(&self, listener: &Listener) -> Result<&Self, EmitterError> {
        self.off(WILDCARD, listener)
    }

    fn subscribe(
        &self,
        event: EventType,
        listener: Listener,
        position: Position,
        lifetime: Lifetime,
    ) -> Result<&Self, EmitterError> {
        let registered = lifetime.wrap(self.downgrade(), event.clone(), listener);
        self.add(event, registered, position)?;
        Ok(self)
    }
}

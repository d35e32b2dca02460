//! # Subscription lifetimes.
//!
//! [`Lifetime`] decides how long a registration stays active:
//!
//! - [`Lifetime::Persistent`] stays until `off`/`clear` (plain `on`).
//! - [`Lifetime::Times`] is removed after `n` invocations (`once`, `many`).
//! - [`Lifetime::Until`] is removed after the listener returns `true`.
//!
//! Finite lifetimes are implemented by wrapping the caller's listener:
//! ```text
//!  active ──invoke──► active ──invoke (counter hits 0 / returns true)──► removed
//! ```
//! `removed` is terminal. A wrapper invoked again from a snapshot taken
//! before its removal does nothing; subscribing again needs a new call.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::core::WeakEmitter;
use crate::events::EventType;
use crate::listeners::listener::{next_id, Listener};

/// How long a subscription stays registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Lifetime {
    /// Until explicitly removed.
    #[default]
    Persistent,
    /// For exactly `n` invocations.
    Times(NonZeroUsize),
    /// Until the listener returns `true`.
    Until,
}

impl Lifetime {
    /// Returns the listener to register for this lifetime.
    ///
    /// `Persistent` registers `listener` itself; finite lifetimes register a
    /// wrapper whose [`original`](Listener::original) is `listener`.
    pub(crate) fn wrap(self, emitter: WeakEmitter, event: EventType, listener: Listener) -> Listener {
        match self {
            Lifetime::Persistent => listener,
            Lifetime::Times(n) => counted(emitter, event, n, listener),
            Lifetime::Until => conditional(emitter, event, listener),
        }
    }
}

/// Wrapper removed after `times` invocations.
///
/// The registration is removed before the final delegation, so a listener
/// that re-emits the same type does not see itself again. The final
/// delegation happens even when removal fails; that failure is reported
/// after the listener ran.
fn counted(emitter: WeakEmitter, event: EventType, times: NonZeroUsize, listener: Listener) -> Listener {
    let id = next_id();
    let remaining = AtomicUsize::new(times.get());
    let original = listener.clone();

    Listener::wrapper(id, listener, move |args| {
        let left = match remaining.fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1)) {
            Ok(previous) => previous - 1,
            Err(_) => return Ok(false),
        };
        let removed = match emitter.upgrade() {
            Some(emitter) if left == 0 => emitter.remove_registration(&event, id, &original),
            _ => Ok(true),
        };
        let outcome = original.call(args);
        if let Err(err) = removed {
            if outcome.is_ok() {
                return Err(err.into());
            }
            tracing::warn!(event = %event, error = %err, "self-removal failed");
        }
        outcome
    })
}

/// Wrapper removed once the listener returns `true`.
///
/// Any other outcome, including an error, keeps the subscription active.
fn conditional(emitter: WeakEmitter, event: EventType, listener: Listener) -> Listener {
    let id = next_id();
    let done = AtomicBool::new(false);
    let original = listener.clone();

    Listener::wrapper(id, listener, move |args| {
        if done.load(Ordering::Acquire) {
            return Ok(false);
        }
        let finished = original.call(args)?;
        if finished && !done.swap(true, Ordering::AcqRel) {
            if let Some(emitter) = emitter.upgrade() {
                emitter.remove_registration(&event, id, &original)?;
            }
        }
        Ok(finished)
    })
}

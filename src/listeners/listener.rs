//! # Function-backed listener (`Listener`)
//!
//! [`Listener`] wraps a closure `F: Fn(&Args) -> R` behind an `Arc`, so the
//! handle is cheap to clone and every clone keeps the same identity.
//! Identity is what [`Emitter::off`](crate::Emitter::off) matches on.
//!
//! ## Return values
//! The closure may return anything implementing [`IntoInvocation`]:
//! - `()`: plain listener;
//! - `bool`: `true` ends an [`until`](crate::Emitter::until) subscription;
//! - `Result<(), E>` / `Result<bool, E>` with `E: Into<ListenerError>`:
//!   an `Err` is collected by the dispatcher and redirected to `error`.
//!
//! ## Wrappers
//! `once`/`many`/`until` register an internal wrapper that keeps a
//! back-reference to the caller's listener ([`Listener::original`]). Only that
//! one level is resolved: a wrapper of a wrapper matches its direct original.
//!
//! ## Example
//! ```rust
//! use nsemitter::{Args, Listener};
//!
//! let l = Listener::new(|args: &Args| args.get::<i32>(0) == Some(&1));
//! let same = l.clone();
//! assert_eq!(l, same);
//! assert_eq!(l.call(&nsemitter::args!(1_i32)).unwrap(), true);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use crate::error::ListenerError;
use crate::events::Args;

/// Global sequence for listener identities.
static LISTENER_SEQ: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a listener; shared by all clones of one [`Listener`].
pub type ListenerId = u64;

/// Result of one listener invocation: `Ok(true)` means "returned `true`".
pub type Invocation = Result<bool, ListenerError>;

type Callback = dyn Fn(&Args) -> Invocation + Send + Sync;

/// Conversion from a closure's return value into an [`Invocation`].
pub trait IntoInvocation {
    fn into_invocation(self) -> Invocation;
}

impl IntoInvocation for () {
    #[inline]
    fn into_invocation(self) -> Invocation {
        Ok(false)
    }
}

impl IntoInvocation for bool {
    #[inline]
    fn into_invocation(self) -> Invocation {
        Ok(self)
    }
}

impl<E: Into<ListenerError>> IntoInvocation for Result<(), E> {
    #[inline]
    fn into_invocation(self) -> Invocation {
        self.map(|()| false).map_err(Into::into)
    }
}

impl<E: Into<ListenerError>> IntoInvocation for Result<bool, E> {
    #[inline]
    fn into_invocation(self) -> Invocation {
        self.map_err(Into::into)
    }
}

/// Shared handle to a listener callback.
#[derive(Clone)]
pub struct Listener {
    id: ListenerId,
    callback: Arc<Callback>,
    original: Option<Arc<Listener>>,
}

impl Listener {
    /// Creates a listener with a fresh identity.
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(&Args) -> R + Send + Sync + 'static,
        R: IntoInvocation,
    {
        Self {
            id: next_id(),
            callback: Arc::new(move |args: &Args| f(args).into_invocation()),
            original: None,
        }
    }

    /// Creates a wrapper with a pre-allocated identity around `original`.
    ///
    /// The id is allocated by the caller so the wrapper closure can refer to
    /// its own registration before it exists.
    pub(crate) fn wrapper<F>(id: ListenerId, original: Listener, f: F) -> Self
    where
        F: Fn(&Args) -> Invocation + Send + Sync + 'static,
    {
        Self {
            id,
            callback: Arc::new(f),
            original: Some(Arc::new(original)),
        }
    }

    /// Identity of this registration; wrappers have their own id.
    #[inline]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// The caller-supplied listener behind an internal wrapper.
    pub fn original(&self) -> Option<&Listener> {
        self.original.as_deref()
    }

    /// The caller-facing identity: the original if this is a wrapper, else `self`.
    pub fn resolve(&self) -> &Listener {
        self.original().unwrap_or(self)
    }

    /// True if `self` is `target` or wraps it directly.
    pub fn matches(&self, target: &Listener) -> bool {
        self.id == target.id || self.original.as_ref().is_some_and(|o| o.id == target.id)
    }

    /// Invokes the callback (no panic isolation at this level).
    #[inline]
    pub fn call(&self, args: &Args) -> Invocation {
        (self.callback)(args)
    }
}

pub(crate) fn next_id() -> ListenerId {
    LISTENER_SEQ.fetch_add(1, AtomicOrdering::Relaxed)
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("original", &self.original.as_ref().map(|o| o.id))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_identities() {
        let a = Listener::new(|_: &Args| {});
        let b = Listener::new(|_: &Args| {});
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_return_conversions() {
        let unit = Listener::new(|_: &Args| {});
        let yes = Listener::new(|_: &Args| true);
        let ok = Listener::new(|_: &Args| Ok::<_, ListenerError>(()));
        let fail = Listener::new(|_: &Args| Err::<bool, _>("nope"));

        let args = Args::new();
        assert!(!unit.call(&args).unwrap());
        assert!(yes.call(&args).unwrap());
        assert!(!ok.call(&args).unwrap());
        assert_eq!(fail.call(&args).unwrap_err().to_string(), "nope");
    }

    #[test]
    fn test_wrapper_matches_original_one_level() {
        let original = Listener::new(|_: &Args| {});
        let wrapper = Listener::wrapper(next_id(), original.clone(), |_| Ok(false));
        let outer = Listener::wrapper(next_id(), wrapper.clone(), |_| Ok(false));

        assert!(wrapper.matches(&original));
        assert!(wrapper.matches(&wrapper));
        assert_eq!(wrapper.resolve(), &original);

        assert!(outer.matches(&wrapper));
        assert!(!outer.matches(&original));
    }

    #[test]
    fn test_plain_listener_resolves_to_itself() {
        let l = Listener::new(|_: &Args| {});
        assert!(l.original().is_none());
        assert_eq!(l.resolve(), &l);
    }
}

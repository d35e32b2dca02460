//! # Emitter: shared handle over one registry.
//!
//! [`Emitter`] is a cheap-to-clone handle (`Arc` inside). Every method takes
//! `&self`; the registry sits behind a `parking_lot::Mutex` that is **never**
//! held while a listener runs, so listeners can call `on`/`off`/`emit` on the
//! same emitter without deadlocking.
//!
//! The methods are split by responsibility:
//! - this file: construction, registry operations, lifecycle (`clear`, `destroy`)
//! - `dispatch.rs`: `emit`, `trigger`, error collection
//! - `subscribe.rs`: `on`, `once`, `many`, `until`, `first`, `at`, `off`
//! - `tick.rs`: deferred emission
//!
//! ## Lifecycle
//! ```text
//! Live ──destroy()──► Destroying ──(":destroy" fired, registry cleared)──► Destroyed
//! ```
//! `Destroyed` is terminal: every operation becomes a no-op, `emit` returns
//! `Ok(false)` and [`snapshot`](Emitter::snapshot) returns [`Snapshot::Destroyed`].

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, MutexGuard};

use crate::core::builder::EmitterBuilder;
use crate::core::config::{default_max_listeners, Config};
use crate::core::registry::{Position, Registry};
use crate::core::snapshot::Snapshot;
use crate::error::EmitterError;
use crate::events::{Args, EventType, DESTROY, MAX_LISTENERS, OFF, ON};
use crate::listeners::{Listener, ListenerId};

const LIVE: u8 = 0;
const DESTROYING: u8 = 1;
const DESTROYED: u8 = 2;

pub(crate) struct Inner {
    registry: Mutex<Registry>,
    state: AtomicU8,
    catch_panics: bool,
}

/// Synchronous event emitter with namespaced dispatch.
///
/// # Example
/// ```
/// use std::sync::{Arc, Mutex};
/// use nsemitter::{args, Args, Emitter, Listener};
///
/// let emitter = Emitter::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let log = Arc::clone(&seen);
/// emitter.on("user", Listener::new(move |args: &Args| {
///     log.lock().unwrap().push(*args.get::<u32>(0).unwrap());
/// }))?;
///
/// assert!(emitter.emit("user:login", args!(7_u32))?);
/// assert!(!emitter.emit("order", args!(1_u32))?);
/// assert_eq!(*seen.lock().unwrap(), vec![7]);
/// # Ok::<(), nsemitter::EmitterError>(())
/// ```
#[derive(Clone)]
pub struct Emitter {
    inner: Arc<Inner>,
}

/// Non-owning handle to an [`Emitter`].
///
/// Listeners that need to reach their own emitter should hold one of these
/// instead of a clone, otherwise the registry keeps itself alive.
#[derive(Clone)]
pub struct WeakEmitter {
    inner: Weak<Inner>,
}

impl WeakEmitter {
    /// Returns the emitter if it is still alive.
    pub fn upgrade(&self) -> Option<Emitter> {
        self.inner.upgrade().map(|inner| Emitter { inner })
    }
}

impl fmt::Debug for WeakEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakEmitter")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl Emitter {
    /// Creates an empty emitter with the default [`Config`].
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty emitter with the given configuration.
    pub fn with_config(cfg: Config) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry: Mutex::new(Registry::new(cfg.max_listeners)),
                state: AtomicU8::new(LIVE),
                catch_panics: cfg.catch_panics,
            }),
        }
    }

    /// Creates an emitter seeded from a type → listeners mapping (applied via `on`).
    pub fn with_listeners<I, T>(mapping: I) -> Result<Self, EmitterError>
    where
        I: IntoIterator<Item = (T, Vec<Listener>)>,
        T: Into<EventType>,
    {
        let emitter = Self::new();
        emitter.on_map(mapping)?;
        Ok(emitter)
    }

    /// Returns a builder for an emitter with custom settings.
    pub fn builder() -> EmitterBuilder {
        EmitterBuilder::new(Config::default())
    }

    /// Non-owning handle, used by listeners that need to reach their emitter.
    pub fn downgrade(&self) -> WeakEmitter {
        WeakEmitter {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// True once [`destroy`](Self::destroy) has completed.
    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.inner.state.load(Ordering::Acquire) == DESTROYED
    }

    #[inline]
    pub(crate) fn catch_panics(&self) -> bool {
        self.inner.catch_panics
    }

    #[inline]
    pub(crate) fn registry(&self) -> MutexGuard<'_, Registry> {
        self.inner.registry.lock()
    }

    /// True if the meta-event `meta` has at least one listener.
    fn observed(&self, meta: &str) -> bool {
        self.registry().contains(&EventType::named(meta))
    }

    /// Registers `listener` (possibly a wrapper) under `event`.
    ///
    /// Fires `:on` before the insert and `:maxListeners` after it when the
    /// insert is the first to exceed the threshold for that type.
    pub(crate) fn add(
        &self,
        event: EventType,
        listener: Listener,
        position: Position,
    ) -> Result<(), EmitterError> {
        if self.is_destroyed() {
            return Ok(());
        }
        self.registry().check_position(&event, position)?;

        if self.observed(ON) {
            self.emit(ON, Args::new().with(event.clone()).with(listener.resolve().clone()))?;
        }

        let inserted = self.registry().insert(event.clone(), listener.clone(), position)?;
        if let Some(max) = inserted.exceeded {
            tracing::warn!(
                event = %event,
                max,
                "possible listener leak: more than {max} listeners registered for one type"
            );
            self.emit(
                MAX_LISTENERS,
                Args::new().with(event).with(listener.resolve().clone()),
            )?;
        }
        Ok(())
    }

    /// Removes the last registration of `event` accepted by `matches`.
    ///
    /// Fires `:off` with `reported` after a successful removal. Returns
    /// whether anything was removed.
    pub(crate) fn remove_matching(
        &self,
        event: &EventType,
        matches: impl Fn(&Listener) -> bool,
        reported: &Listener,
    ) -> Result<bool, EmitterError> {
        let removed = self.registry().remove_last(event, matches);
        if removed.is_none() {
            return Ok(false);
        }
        if self.observed(OFF) {
            self.emit(OFF, Args::new().with(event.clone()).with(reported.clone()))?;
        }
        Ok(true)
    }

    /// Removes the registration with identity `id`; used by self-removing wrappers.
    pub(crate) fn remove_registration(
        &self,
        event: &EventType,
        id: ListenerId,
        reported: &Listener,
    ) -> Result<bool, EmitterError> {
        self.remove_matching(event, |l| l.id() == id, reported)
    }

    /// Copy of the listeners registered for `event`, in dispatch order.
    ///
    /// Wrappers created by `once`/`many`/`until` are returned as registered;
    /// use [`Listener::resolve`] to get the caller's listener.
    pub fn listeners(&self, event: impl Into<EventType>) -> Vec<Listener> {
        if self.is_destroyed() {
            return Vec::new();
        }
        self.registry().listeners(&event.into())
    }

    /// Number of listeners registered for exactly `event`.
    pub fn listener_count(&self, event: impl Into<EventType>) -> usize {
        if self.is_destroyed() {
            return 0;
        }
        self.registry().count(&event.into())
    }

    /// Returns sorted list of event types that currently have listeners.
    pub fn event_types(&self) -> Vec<EventType> {
        if self.is_destroyed() {
            return Vec::new();
        }
        self.registry().types()
    }

    /// Removes every listener of every type.
    ///
    /// When `:off` is observed, each removal fires `:off`, and `:off` itself is
    /// cleared last so its listeners see their siblings go. Without `:off`
    /// listeners the registry is emptied in one step.
    pub fn clear(&self) -> Result<&Self, EmitterError> {
        if self.is_destroyed() {
            return Ok(self);
        }
        if !self.observed(OFF) {
            self.registry().clear();
            return Ok(self);
        }

        let off = EventType::named(OFF);
        let types = self.registry().types();
        for event in types.iter().filter(|event| **event != off) {
            self.drain(event)?;
        }
        self.drain(&off)?;
        Ok(self)
    }

    /// Removes every listener of `event` (firing `:off` per removal when observed).
    pub fn clear_event(&self, event: impl Into<EventType>) -> Result<&Self, EmitterError> {
        if self.is_destroyed() {
            return Ok(self);
        }
        let event = event.into();
        if !self.observed(OFF) {
            self.registry().clear_event(&event);
            return Ok(self);
        }
        self.drain(&event)?;
        Ok(self)
    }

    /// Removes the listeners present at call time, most recent first.
    ///
    /// Listeners added by `:off` observers while draining stay registered.
    fn drain(&self, event: &EventType) -> Result<(), EmitterError> {
        let pending = self.registry().listeners(event);
        for listener in pending.iter().rev() {
            let id = listener.id();
            self.remove_matching(event, |l| l.id() == id, listener.resolve())?;
        }
        Ok(())
    }

    /// Sets this instance's threshold (`None` = process default, `Some(0)` = unlimited).
    pub fn set_max_listeners(&self, n: impl Into<Option<usize>>) -> &Self {
        if !self.is_destroyed() {
            self.registry().set_max_listeners(n.into());
        }
        self
    }

    /// Effective threshold: the instance value, else the process default (`0` = unlimited).
    pub fn get_max_listeners(&self) -> usize {
        self.registry()
            .max_listeners()
            .unwrap_or_else(default_max_listeners)
    }

    /// Fires `:destroy`, clears every listener and makes the instance inert.
    ///
    /// Failures raised while notifying listeners are logged, not returned:
    /// the instance always ends up destroyed. Calling it again is a no-op.
    pub fn destroy(&self) {
        if self
            .inner
            .state
            .compare_exchange(LIVE, DESTROYING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        if let Err(err) = self.emit(DESTROY, Args::new()) {
            tracing::warn!(error = %err, label = err.as_label(), "destroy notification failed");
        }
        if let Err(err) = self.clear() {
            tracing::warn!(error = %err, label = err.as_label(), "clear during destroy failed");
        }

        self.inner.state.store(DESTROYED, Ordering::Release);
        self.registry().clear();
        tracing::debug!("emitter destroyed");
    }

    /// Current state as a serializable value (the `toJSON` form).
    pub fn snapshot(&self) -> Snapshot {
        if self.is_destroyed() {
            return Snapshot::Destroyed;
        }
        let registry = self.registry();
        Snapshot::Live {
            max_listeners: registry.max_listeners().unwrap_or_else(default_max_listeners),
            listener_count: registry.counts(),
        }
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("types", &self.event_types().len())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

/// Renders the [`Snapshot`] (`toString`).
impl fmt::Display for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.snapshot(), f)
    }
}

//! # Emitter configuration.
//!
//! Provides [`Config`] per-instance settings and the process-wide default
//! max-listeners threshold.
//!
//! Config is used in two ways:
//! 1. **Emitter creation**: `Emitter::with_config(config)` / `Emitter::builder()`
//! 2. **Threshold lookup**: an instance without its own `max_listeners`
//!    reads [`default_max_listeners`] each time a listener is added.
//!
//! ## Sentinel values
//! - `max_listeners = None` → use the process-wide default
//! - `max_listeners = Some(0)` or default `0` → unlimited (no alert)

use std::sync::atomic::{AtomicUsize, Ordering};

/// Process-wide threshold applied to instances without their own value.
static DEFAULT_MAX_LISTENERS: AtomicUsize = AtomicUsize::new(10);

/// Returns the process-wide max-listeners default (`0` = unlimited).
#[inline]
pub fn default_max_listeners() -> usize {
    DEFAULT_MAX_LISTENERS.load(Ordering::Relaxed)
}

/// Sets the process-wide max-listeners default (`0` = unlimited).
///
/// Affects every instance that has not set its own threshold, including
/// instances created before the call.
pub fn set_default_max_listeners(n: usize) {
    DEFAULT_MAX_LISTENERS.store(n, Ordering::Relaxed);
}

/// Per-instance configuration.
///
/// ## Field semantics
/// - `max_listeners`: alert threshold per type (`None` = process default, `Some(0)` = unlimited)
/// - `catch_panics`: isolate panicking listeners the same way as returned errors
#[derive(Clone, Debug)]
pub struct Config {
    /// Number of listeners per type above which `:maxListeners` fires once.
    pub max_listeners: Option<usize>,

    /// Capture listener panics during dispatch.
    ///
    /// - `true`: a panic becomes a [`ListenerError`](crate::ListenerError)
    ///   redirected to `error`, sibling listeners still run
    /// - `false`: the panic unwinds through `emit`
    pub catch_panics: bool,
}

impl Config {
    /// Resolves the effective threshold as an `Option`.
    ///
    /// - `None` → unlimited
    /// - `Some(n)` → alert once a type holds more than `n` listeners
    #[inline]
    pub fn max_listeners_limit(&self) -> Option<usize> {
        limit(self.max_listeners)
    }
}

/// Resolves an instance threshold against the process default.
#[inline]
pub(crate) fn limit(instance: Option<usize>) -> Option<usize> {
    match instance.unwrap_or_else(default_max_listeners) {
        0 => None,
        n => Some(n),
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `max_listeners = None` (process-wide default, initially 10)
    /// - `catch_panics = true`
    fn default() -> Self {
        Self {
            max_listeners: None,
            catch_panics: true,
        }
    }
}

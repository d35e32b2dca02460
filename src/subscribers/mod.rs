//! # Built-in observers.
//!
//! Observers are ordinary listeners on the meta-events an emitter fires
//! about itself:
//!
//! ```text
//!   on(..)  ── ":on"           (type, listener) ──┐
//!   off(..) ── ":off"          (type, listener) ──┼──► LogWriter ──► tracing
//!   add > max ":maxListeners"  (type, listener) ──┤
//!   destroy() ":destroy"       ()               ──┘
//! ```
//!
//! ## Implementing custom observers
//! ```
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use nsemitter::{Args, Emitter, Listener, ON};
//!
//! let added = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&added);
//!
//! let emitter = Emitter::new();
//! emitter.on(ON, Listener::new(move |_: &Args| {
//!     counter.fetch_add(1, Ordering::Relaxed);
//! }))?;
//! emitter.on("job", Listener::new(|_: &Args| {}))?;
//! assert_eq!(added.load(Ordering::Relaxed), 1);
//! # Ok::<(), nsemitter::EmitterError>(())
//! ```

mod log;

pub use log::LogWriter;

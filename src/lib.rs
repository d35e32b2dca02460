//! # nsemitter
//!
//! **nsemitter** is a synchronous in-process event emitter for Rust.
//!
//! It maps event types to listeners and adds a handful of policies on top
//! of that mapping: `:`-namespaced dispatch, a wildcard type, listeners that
//! remove themselves (`once`, `many`, `until`), positioned insertion,
//! meta-events about the emitter itself and per-listener error isolation.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   on / once / many / until / first / at        emit / trigger / tick
//!                 │                                       │
//!                 ▼                                       ▼
//! ┌──────────────────────────────┐      ┌───────────────────────────────────┐
//! │  Subscription builder        │      │  Dispatcher                       │
//! │  - wraps finite listeners    │      │  - namespace levels, then "*"     │
//! │  - validates position/count  │      │  - snapshot before invoking       │
//! └──────────────┬───────────────┘      │  - collects failures → "error"    │
//!                ▼                      └─────────────────┬─────────────────┘
//! ┌───────────────────────────────────────────────────────┴─────────────────┐
//! │  Registry  (EventType → One(listener) | Many { listeners, warned })     │
//! │  ":on" before add   ":off" after remove   ":maxListeners" once per type │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Emission
//! ```text
//! emit("a:b:c", args)
//!   ├─► "a:b:c" listeners ─┐
//!   ├─► "a:b"   listeners  ├─ each listener guarded; failures collected
//!   ├─► "a"     listeners  │  and re-emitted on "error" after the level
//!   └─► "*"     listeners ─┘
//!
//! "error" level reached with no "error" listener ──► Err(EmitterError::Unhandled)
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types                              |
//! |-------------------|----------------------------------------------------------|----------------------------------------|
//! | **Emitter**       | Subscribe, emit, introspect, clear, destroy.             | [`Emitter`], [`EmitterBuilder`]        |
//! | **Events**        | Namespaced event types and positional payloads.          | [`EventType`], [`Args`], [`args!`]     |
//! | **Listeners**     | Identity-carrying callbacks and their lifetimes.         | [`Listener`], [`Lifetime`]             |
//! | **Errors**        | Typed emitter errors and listener failure values.        | [`EmitterError`], [`ListenerError`]    |
//! | **Deferred**      | Emission scheduled on the tokio runtime.                 | [`Tick`]                               |
//! | **Mixin**         | Put the emitter API on other types.                      | [`Evented`], [`Mixin`], [`Selection`]  |
//! | **Configuration** | Per-instance and process-wide max-listeners, panics.     | [`Config`]                             |
//!
//! ## Optional features
//! - `logging` _(default)_: exports [`LogWriter`], a `tracing`-based meta-event logger.
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use nsemitter::{args, Args, Emitter, Listener, ListenerError, ERROR};
//!
//! let emitter = Emitter::new();
//! let failures = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = Arc::clone(&failures);
//! emitter
//!     .on(ERROR, Listener::new(move |args: &Args| {
//!         if let Some(err) = args.get::<ListenerError>(0) {
//!             sink.lock().unwrap().push(err.to_string());
//!         }
//!     }))?
//!     .on("job", Listener::new(|_: &Args| Err::<(), _>("job failed")))?
//!     .once("job:done", Listener::new(|args: &Args| {
//!         println!("done: {:?}", args.get::<u32>(0));
//!     }))?;
//!
//! assert!(emitter.emit("job:done", args!(7_u32))?);
//! assert_eq!(*failures.lock().unwrap(), vec!["job failed"]);
//! assert_eq!(emitter.listener_count("job:done"), 0);
//! # Ok::<(), nsemitter::EmitterError>(())
//! ```
mod api;
mod core;
mod error;
mod events;
mod listeners;

// ---- Public re-exports ----

pub use api::{Evented, Mixin, Operation, Reply, Selection};
pub use crate::core::{
    default_max_listeners, set_default_max_listeners, Config, Emitter, EmitterBuilder, Snapshot,
    Tick, WeakEmitter,
};
pub use error::{EmitterError, ListenerError};
pub use events::{Arg, Args, EventType, Levels, DESTROY, ERROR, MAX_LISTENERS, OFF, ON, WILDCARD};
pub use listeners::{IntoInvocation, Invocation, Lifetime, Listener, ListenerId};

// Optional: expose a simple built-in meta-event logger.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
mod subscribers;
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;

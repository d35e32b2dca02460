//! # Built-in meta-event logger.
//!
//! [`LogWriter`] subscribes to the meta-events of one emitter and writes one
//! `tracing` record per notification. Useful for development, debugging and
//! the demos.
//!
//! ## Output format
//! ```text
//! [listener-added] event=user:login listener=12
//! [listener-removed] event=user:login listener=12
//! [max-listeners] event=tick listener=40 max=10
//! [destroy]
//! ```
//!
//! ## Example
//! ```
//! use nsemitter::{Args, Emitter, Listener, LogWriter};
//!
//! let emitter = Emitter::new();
//! let log = LogWriter::attach(&emitter)?;
//! emitter.on("ready", Listener::new(|_: &Args| {}))?; // [listener-added] event=ready ...
//! log.detach()?;
//! # Ok::<(), nsemitter::EmitterError>(())
//! ```

use crate::core::{Emitter, WeakEmitter};
use crate::error::EmitterError;
use crate::events::{Args, EventType, DESTROY, MAX_LISTENERS, OFF, ON};
use crate::listeners::Listener;

/// Logging observer over `:on`, `:off`, `:maxListeners` and `:destroy`.
///
/// Enabled via the `logging` feature. It does not listen on `error`, so
/// attaching it never changes whether failures count as unhandled.
#[derive(Debug)]
pub struct LogWriter {
    emitter: WeakEmitter,
    hooks: Vec<(EventType, Listener)>,
}

impl LogWriter {
    /// Subscribes the logger to `emitter`'s meta-events.
    pub fn attach(emitter: &Emitter) -> Result<Self, EmitterError> {
        let weak = emitter.downgrade();
        let limit = weak.clone();
        let hooks = vec![
            (
                EventType::named(OFF),
                Listener::new(|args: &Args| {
                    let (event, listener) = subject(args);
                    tracing::info!(event = %event, listener, "[listener-removed]");
                }),
            ),
            (
                EventType::named(MAX_LISTENERS),
                Listener::new(move |args: &Args| {
                    let (event, listener) = subject(args);
                    let max = limit.upgrade().map_or(0, |e| e.get_max_listeners());
                    tracing::warn!(event = %event, listener, max, "[max-listeners]");
                }),
            ),
            (
                EventType::named(DESTROY),
                Listener::new(|_: &Args| tracing::info!("[destroy]")),
            ),
            (
                EventType::named(ON),
                Listener::new(|args: &Args| {
                    let (event, listener) = subject(args);
                    tracing::info!(event = %event, listener, "[listener-added]");
                }),
            ),
        ];

        for (event, listener) in &hooks {
            emitter.on(event.clone(), listener.clone())?;
        }
        Ok(Self {
            emitter: weak,
            hooks,
        })
    }

    /// Removes the logger's listeners. A no-op if the emitter is gone.
    pub fn detach(self) -> Result<(), EmitterError> {
        let Some(emitter) = self.emitter.upgrade() else {
            return Ok(());
        };
        for (event, listener) in self.hooks.iter().rev() {
            emitter.off(event.clone(), listener)?;
        }
        Ok(())
    }
}

/// `(event, listener id)` carried by `:on`, `:off` and `:maxListeners`.
fn subject(args: &Args) -> (String, u64) {
    let event = args
        .get::<EventType>(0)
        .map(ToString::to_string)
        .unwrap_or_default();
    let listener = args.get::<Listener>(1).map_or(0, Listener::id);
    (event, listener)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;

    #[test]
    fn test_attach_and_detach() {
        let emitter = Emitter::new();
        let log = LogWriter::attach(&emitter).unwrap();
        for meta in [ON, OFF, MAX_LISTENERS, DESTROY] {
            assert_eq!(emitter.listener_count(meta), 1);
        }

        log.detach().unwrap();
        assert!(emitter.event_types().is_empty());
    }

    #[test]
    fn test_does_not_observe_errors() {
        let emitter = Emitter::new();
        let _log = LogWriter::attach(&emitter).unwrap();
        emitter
            .on("x", Listener::new(|_: &Args| Err::<(), _>("boom")))
            .unwrap();
        assert!(emitter.emit("x", args!()).is_err());
    }

    #[test]
    fn test_detach_after_drop_is_noop() {
        let emitter = Emitter::new();
        let log = LogWriter::attach(&emitter).unwrap();
        drop(emitter);
        assert!(log.detach().is_ok());
    }
}

//! # Dispatch: namespaced emission with error collection.
//!
//! ```text
//! emit("a:b:c", args)
//!   ├─ dispatch_one("a:b:c")   ┐
//!   ├─ dispatch_one("a:b")     │ each: snapshot → run all → redirect failures to "error"
//!   ├─ dispatch_one("a")       │
//!   └─ dispatch_one("*")       ┘
//! ```
//!
//! ## Rules
//! - Each type's listener list is copied before invocation; changes made by
//!   listeners affect the next dispatch, not the running one.
//! - Every listener of one dispatch runs even if earlier ones fail.
//! - Collected failures are re-emitted as `error` **after** the loop. That
//!   `error` dispatch has no guard: its failures propagate out of `emit`.
//! - Reaching the `error` level with no `error` listener fails with
//!   [`EmitterError::Unhandled`]. For `error` itself nothing runs; for
//!   `error:net` the more specific levels run first and the wildcard does not.

use std::panic::{self, AssertUnwindSafe};

use crate::core::emitter::Emitter;
use crate::error::{EmitterError, ListenerError, UNSPECIFIED_ERROR};
use crate::events::{Arg, Args, EventType, WILDCARD};
use crate::listeners::Listener;

impl Emitter {
    /// Dispatches `event` to its own listeners, to those of every namespace
    /// ancestor (most specific first) and finally to wildcard listeners.
    ///
    /// Returns whether at least one listener ran. A destroyed emitter returns
    /// `Ok(false)`.
    ///
    /// # Errors
    /// - [`EmitterError::Unhandled`] when `error` or a type under it
    ///   (`error:net`) is emitted without `error` listeners, or when a
    ///   listener fails and nobody listens on `error`. The carried value is
    ///   the first argument when it is a [`ListenerError`], an
    ///   [`EmitterError`] or an `Arc<dyn Error + Send + Sync>`; otherwise a
    ///   generic error.
    /// - [`EmitterError::ErrorListener`] when an `error` listener fails while
    ///   handling a redirected failure.
    pub fn emit(&self, event: impl Into<EventType>, args: Args) -> Result<bool, EmitterError> {
        if self.is_destroyed() {
            return Ok(false);
        }
        let event = event.into();

        let mut executed = false;
        for level in event.levels() {
            if level.is_error() && self.listener_count(&level) == 0 {
                return Err(unhandled(&event, &args));
            }
            executed |= self.dispatch_one(&level, &args)?;
        }
        executed |= self.dispatch_one(&WILDCARD, &args)?;
        Ok(executed)
    }

    /// Same as [`emit`](Self::emit) with arguments given as a sequence.
    pub fn trigger<I>(&self, event: impl Into<EventType>, args: I) -> Result<bool, EmitterError>
    where
        I: IntoIterator<Item = Arg>,
    {
        self.emit(event, args.into_iter().collect())
    }

    /// Runs every listener registered for exactly `event`.
    fn dispatch_one(&self, event: &EventType, args: &Args) -> Result<bool, EmitterError> {
        let listeners = self.registry().listeners(event);
        if listeners.is_empty() {
            return Ok(false);
        }

        let failures: Vec<ListenerError> = listeners
            .iter()
            .filter_map(|listener| self.invoke(listener, args).err())
            .collect();

        for failure in failures {
            tracing::debug!(event = %event, error = %failure, "listener failed; redirecting to error");
            self.redirect(failure)?;
        }
        Ok(true)
    }

    /// Invokes one listener under the dispatch guard.
    fn invoke(&self, listener: &Listener, args: &Args) -> Result<(), ListenerError> {
        if !self.catch_panics() {
            return listener.call(args).map(drop);
        }
        match panic::catch_unwind(AssertUnwindSafe(|| listener.call(args))) {
            Ok(outcome) => outcome.map(drop),
            Err(payload) => {
                let err = ListenerError::from_panic(payload);
                tracing::warn!(listener = listener.id(), error = %err, "listener panicked");
                Err(err)
            }
        }
    }

    /// Dispatches a collected failure to `error` listeners, unguarded.
    fn redirect(&self, failure: ListenerError) -> Result<(), EmitterError> {
        let listeners = self.registry().listeners(&EventType::error());
        if listeners.is_empty() {
            return Err(EmitterError::Unhandled { source: failure });
        }

        let args = Args::new().with(failure);
        for listener in &listeners {
            listener
                .call(&args)
                .map_err(|source| EmitterError::ErrorListener { source })?;
        }
        Ok(())
    }
}

/// Failure for an `error` level reached with nobody listening.
fn unhandled(event: &EventType, args: &Args) -> EmitterError {
    let source = args
        .leading_error()
        .unwrap_or_else(|| ListenerError::msg(UNSPECIFIED_ERROR));
    tracing::debug!(event = %event, error = %source, "unhandled error event");
    EmitterError::Unhandled { source }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::args;
    use crate::core::Config;
    use crate::events::ERROR;

    fn tagged(log: &Arc<Mutex<Vec<&'static str>>>, tag: &'static str) -> Listener {
        let log = Arc::clone(log);
        Listener::new(move |_: &Args| log.lock().unwrap().push(tag))
    }

    #[test]
    fn test_namespace_order_then_wildcard() {
        let emitter = Emitter::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        emitter.on_any(tagged(&log, "*")).unwrap();
        emitter.on("a", tagged(&log, "a")).unwrap();
        emitter.on("a:b", tagged(&log, "a:b")).unwrap();
        emitter.on("a:b:c", tagged(&log, "a:b:c")).unwrap();

        assert!(emitter.emit("a:b:c", args!()).unwrap());
        assert_eq!(*log.lock().unwrap(), vec!["a:b:c", "a:b", "a", "*"]);
    }

    #[test]
    fn test_wildcard_only_counts_as_executed() {
        let emitter = Emitter::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        emitter.on_any(tagged(&log, "*")).unwrap();
        assert!(emitter.emit("nothing:here", args!()).unwrap());
        assert!(!Emitter::new().emit("nothing", args!()).unwrap());
    }

    #[test]
    fn test_emitting_wildcard_runs_it_once() {
        let emitter = Emitter::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        emitter.on_any(tagged(&log, "*")).unwrap();
        emitter.emit(WILDCARD, args!()).unwrap();
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_failure_redirected_after_siblings() {
        let emitter = Emitter::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::new(Mutex::new(None));

        let s = Arc::clone(&seen);
        let l = Arc::clone(&log);
        emitter
            .on(
                ERROR,
                Listener::new(move |args: &Args| {
                    l.lock().unwrap().push("error");
                    *s.lock().unwrap() = args.get::<ListenerError>(0).map(ToString::to_string);
                }),
            )
            .unwrap();
        emitter
            .on("x", Listener::new(|_: &Args| Err::<(), _>("first failed")))
            .unwrap();
        emitter.on("x", tagged(&log, "second")).unwrap();

        assert!(emitter.emit("x", args!()).unwrap());
        assert_eq!(*log.lock().unwrap(), vec!["second", "error"]);
        assert_eq!(seen.lock().unwrap().as_deref(), Some("first failed"));
    }

    #[test]
    fn test_unhandled_listener_failure() {
        let emitter = Emitter::new();
        emitter
            .on("x", Listener::new(|_: &Args| Err::<(), _>("boom")))
            .unwrap();
        let err = emitter.emit("x", args!()).unwrap_err();
        assert!(matches!(err, EmitterError::Unhandled { .. }));
        assert_eq!(err.listener_error().map(ToString::to_string).as_deref(), Some("boom"));
    }

    #[test]
    fn test_emit_error_without_listeners() {
        let emitter = Emitter::new();
        let given = ListenerError::msg("given");

        let err = emitter.emit(ERROR, args!(given.clone())).unwrap_err();
        assert!(err.listener_error().is_some_and(|e| e.ptr_eq(&given)));

        let err = emitter.emit(ERROR, args!()).unwrap_err();
        assert_eq!(
            err.listener_error().map(ToString::to_string).as_deref(),
            Some(UNSPECIFIED_ERROR)
        );
    }

    #[test]
    fn test_namespaced_error_without_listeners_fails() {
        let emitter = Emitter::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        emitter.on("error:net", tagged(&log, "error:net")).unwrap();
        emitter.on_any(tagged(&log, "*")).unwrap();
        let given = ListenerError::msg("net down");

        let err = emitter.emit("error:net", args!(given.clone())).unwrap_err();
        assert!(matches!(err, EmitterError::Unhandled { .. }));
        assert!(err.listener_error().is_some_and(|e| e.ptr_eq(&given)));
        assert_eq!(*log.lock().unwrap(), vec!["error:net"]);
    }

    #[test]
    fn test_namespaced_error_reaches_error_listeners() {
        let emitter = Emitter::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        emitter.on(ERROR, tagged(&log, "error")).unwrap();

        assert!(emitter.emit("error:net", args!(ListenerError::msg("net down"))).unwrap());
        assert_eq!(*log.lock().unwrap(), vec!["error"]);
    }

    #[test]
    fn test_emit_error_with_emitter_error_value() {
        let emitter = Emitter::new();
        let err = emitter
            .emit(ERROR, args!(EmitterError::UnknownOperation { name: "x".into() }))
            .unwrap_err();
        assert_eq!(
            err.listener_error().map(ToString::to_string).as_deref(),
            Some("unknown operation `x`")
        );
    }

    #[test]
    fn test_error_listener_failure_propagates() {
        let emitter = Emitter::new();
        emitter
            .on(ERROR, Listener::new(|_: &Args| Err::<(), _>("handler broke")))
            .unwrap();
        emitter
            .on("x", Listener::new(|_: &Args| Err::<(), _>("boom")))
            .unwrap();

        let err = emitter.emit("x", args!()).unwrap_err();
        assert!(matches!(err, EmitterError::ErrorListener { .. }));
        assert_eq!(err.to_string(), "error listener failed: handler broke");
    }

    #[test]
    fn test_panic_is_captured_and_siblings_run() {
        let emitter = Emitter::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::new(Mutex::new(false));

        let c = Arc::clone(&captured);
        emitter
            .on(
                ERROR,
                Listener::new(move |args: &Args| {
                    *c.lock().unwrap() = args.get::<ListenerError>(0).is_some_and(ListenerError::is_panic);
                }),
            )
            .unwrap();
        emitter
            .on("x", Listener::new(|_: &Args| -> bool { panic!("listener exploded") }))
            .unwrap();
        emitter.on("x", tagged(&log, "after")).unwrap();

        assert!(emitter.emit("x", args!()).unwrap());
        assert_eq!(*log.lock().unwrap(), vec!["after"]);
        assert!(*captured.lock().unwrap());
    }

    #[test]
    fn test_panics_unwind_when_capture_disabled() {
        let emitter = Emitter::with_config(Config {
            catch_panics: false,
            ..Config::default()
        });
        emitter
            .on("x", Listener::new(|_: &Args| -> bool { panic!("raw") }))
            .unwrap();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| emitter.emit("x", args!())));
        assert!(outcome.is_err());
    }

    #[test]
    fn test_trigger_matches_emit() {
        let emitter = Emitter::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        emitter
            .on(
                "sum",
                Listener::new(move |args: &Args| {
                    let total: i32 = (0..args.len()).filter_map(|i| args.get::<i32>(i)).sum();
                    s.lock().unwrap().push(total);
                }),
            )
            .unwrap();

        let values: Vec<Arg> = vec![Arc::new(1_i32), Arc::new(2_i32)];
        assert!(emitter.trigger("sum", values).unwrap());
        assert!(emitter.emit("sum", args!(1_i32, 2_i32)).unwrap());
        assert_eq!(*seen.lock().unwrap(), vec![3, 3]);
    }

    #[test]
    fn test_removing_later_sibling_does_not_affect_running_dispatch() {
        let emitter = Emitter::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let weak = emitter.downgrade();
        let second = tagged(&log, "second");
        let target = second.clone();
        emitter
            .on(
                "x",
                Listener::new(move |_: &Args| {
                    if let Some(e) = weak.upgrade() {
                        e.off("x", &target).unwrap();
                    }
                }),
            )
            .unwrap();
        emitter.on("x", second).unwrap();

        emitter.emit("x", args!()).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["second"]);
        assert_eq!(emitter.listener_count("x"), 1);

        emitter.emit("x", args!()).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["second"]);
    }

    #[test]
    fn test_listener_mutations_apply_to_next_emit() {
        let emitter = Emitter::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let weak = emitter.downgrade();
        let late = tagged(&log, "late");
        emitter
            .on(
                "x",
                Listener::new(move |_: &Args| {
                    if let Some(e) = weak.upgrade() {
                        e.on("x", late.clone()).unwrap();
                    }
                }),
            )
            .unwrap();

        emitter.emit("x", args!()).unwrap();
        assert!(log.lock().unwrap().is_empty());
        emitter.emit("x", args!()).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["late"]);
    }
}

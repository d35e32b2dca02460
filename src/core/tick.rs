//! # Deferred emission.
//!
//! [`Emitter::tick`] schedules an `emit` on the current tokio runtime and
//! returns a [`Tick`] future that resolves with the outcome.
//!
//! ```text
//! tick(event, args) ──spawn──► task: yield_now → emit(event, args)
//!        │                                   │
//!        └── Tick ◄───────── Ok(()) / Err(NoListeners | emit error)
//! ```
//!
//! ## Rules
//! - The emission never runs inside the `tick` call itself.
//! - The task is detached: dropping the [`Tick`] does not cancel the emission.
//! - Without a runtime the returned [`Tick`] resolves to [`EmitterError::NoRuntime`].

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::{self, BoxFuture};
use futures::FutureExt;
use tokio::runtime::Handle;

use crate::core::emitter::Emitter;
use crate::error::EmitterError;
use crate::events::{Args, EventType};

/// Pending outcome of a deferred emission.
///
/// Resolves to `Ok(())` when at least one listener ran.
#[must_use = "a Tick reports whether the deferred emission reached any listener"]
pub struct Tick {
    event: EventType,
    outcome: BoxFuture<'static, Result<(), EmitterError>>,
}

impl Tick {
    /// The event type being emitted.
    pub fn event(&self) -> &EventType {
        &self.event
    }
}

impl Future for Tick {
    type Output = Result<(), EmitterError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.outcome.poll_unpin(cx)
    }
}

impl fmt::Debug for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tick").field("event", &self.event).finish()
    }
}

impl Emitter {
    /// Schedules `emit(event, args)` on the current tokio runtime.
    ///
    /// The returned future fails with [`EmitterError::NoListeners`] when the
    /// emission ran but reached nobody, and with the emission's own error
    /// when it failed.
    pub fn tick(&self, event: impl Into<EventType>, args: Args) -> Tick {
        let event = event.into();
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                let err = EmitterError::NoRuntime { event: event.clone() };
                return Tick {
                    event,
                    outcome: future::ready(Err(err)).boxed(),
                };
            }
        };

        let emitter = self.clone();
        let scheduled = event.clone();
        let task = handle.spawn(async move {
            tokio::task::yield_now().await;
            let outcome: Result<(), EmitterError> = match emitter.emit(scheduled.clone(), args) {
                Ok(true) => Ok(()),
                Ok(false) => Err(EmitterError::NoListeners { event: scheduled }),
                Err(err) => Err(err),
            };
            outcome
        });
        tracing::debug!(event = %event, "deferred emission scheduled");

        let aborted = event.clone();
        Tick {
            event,
            outcome: task
                .map(move |joined| {
                    joined.unwrap_or_else(|_| Err(EmitterError::TickAborted { event: aborted }))
                })
                .boxed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::args;
    use crate::listeners::Listener;

    #[tokio::test]
    async fn test_tick_runs_after_call_returns() {
        let emitter = Emitter::new();
        let ran = Arc::new(AtomicBool::new(false));
        let r = Arc::clone(&ran);
        emitter
            .on(
                "x",
                Listener::new(move |_: &Args| r.store(true, Ordering::SeqCst)),
            )
            .unwrap();

        let tick = emitter.tick("x", args!());
        assert!(!ran.load(Ordering::SeqCst));
        tick.await.unwrap();
        assert!(ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_tick_without_listeners_fails() {
        let emitter = Emitter::new();
        let err = emitter.tick("nobody", args!()).await.unwrap_err();
        assert!(matches!(err, EmitterError::NoListeners { .. }));
        assert_eq!(err.as_label(), "emitter_no_listeners");
    }

    #[tokio::test]
    async fn test_tick_reports_emit_error() {
        let emitter = Emitter::new();
        emitter
            .on("x", Listener::new(|_: &Args| Err::<(), _>("boom")))
            .unwrap();
        let err = emitter.tick("x", args!()).await.unwrap_err();
        assert!(matches!(err, EmitterError::Unhandled { .. }));
    }

    #[tokio::test]
    async fn test_dropped_tick_still_emits() {
        let emitter = Emitter::new();
        let ran = Arc::new(AtomicBool::new(false));
        let r = Arc::clone(&ran);
        emitter
            .on(
                "x",
                Listener::new(move |_: &Args| r.store(true, Ordering::SeqCst)),
            )
            .unwrap();

        drop(emitter.tick("x", args!()));
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn test_tick_outside_runtime() {
        let emitter = Emitter::new();
        let tick = emitter.tick("x", args!());
        assert_eq!(tick.event(), &EventType::from("x"));
        let err = futures::executor::block_on(tick).unwrap_err();
        assert!(matches!(err, EmitterError::NoRuntime { .. }));
    }
}

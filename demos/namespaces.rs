//! # Example: namespaces
//!
//! Demonstrates namespaced dispatch, finite listeners, error redirection and
//! the built-in [`LogWriter`].
//!
//! Shows how to:
//! - Listen on a namespace root (`order`) and receive `order:*` emissions.
//! - Use `once`/`many`/`until` and positioned insertion.
//! - Observe listener failures through `error`.
//! - Defer an emission with `tick`.
//!
//! ## Flow
//! ```text
//! emit("order:paid:card")
//!     ├─► "order:paid:card" listeners
//!     ├─► "order:paid"      listeners
//!     ├─► "order"           listeners (audit)
//!     └─► "*"               listeners (counter)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example namespaces
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use nsemitter::{args, Args, Emitter, EmitterError, Listener, ListenerError, LogWriter, ERROR};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), EmitterError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let emitter = Emitter::builder().with_max_listeners(4).build()?;
    let log = LogWriter::attach(&emitter)?;

    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);

    emitter
        .on_any(Listener::new(move |_: &Args| {
            counter.fetch_add(1, Ordering::Relaxed);
        }))?
        .on(
            "order",
            Listener::new(|args: &Args| {
                println!("[audit] order event id={:?}", args.get::<u32>(0));
            }),
        )?
        .first(
            "order",
            Listener::new(|_: &Args| println!("[audit] (runs first)")),
        )?
        .once(
            "order:paid",
            Listener::new(|args: &Args| println!("[paid] first payment id={:?}", args.get::<u32>(0))),
        )?
        .until(
            "order:shipped",
            Listener::new(|args: &Args| args.get::<u32>(0).is_some_and(|id| *id >= 3)),
        )?
        .on(
            ERROR,
            Listener::new(|args: &Args| {
                if let Some(err) = args.get::<ListenerError>(0) {
                    println!("[error] {err}");
                }
            }),
        )?
        .on(
            "order:refund",
            Listener::new(|_: &Args| Err::<(), _>("refunds are disabled")),
        )?;

    emitter.emit("order:paid:card", args!(1_u32))?;
    emitter.emit("order:paid", args!(2_u32))?;
    for id in 1..=4_u32 {
        emitter.emit("order:shipped", args!(id))?;
    }
    emitter.emit("order:refund", args!(5_u32))?;

    emitter.tick("order:archived", args!(6_u32)).await?;

    println!("[summary] wildcard saw {} emissions", seen.load(Ordering::Relaxed));
    println!("[summary] {emitter}");

    log.detach()?;
    emitter.destroy();
    println!("[summary] {emitter}");
    Ok(())
}

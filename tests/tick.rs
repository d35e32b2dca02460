use std::sync::{Arc, Mutex};
use std::time::Duration;

use nsemitter::{args, Args, Emitter, EmitterError, Listener};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn tick_emits_later_with_arguments() {
    let emitter = Emitter::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let s = Arc::clone(&seen);
    emitter
        .on(
            "job",
            Listener::new(move |args: &Args| {
                s.lock().unwrap().push(args.get::<String>(0).cloned());
            }),
        )
        .unwrap();

    let pending = emitter.tick("job:done", args!(String::from("payload")));
    tokio::time::timeout(Duration::from_secs(1), pending)
        .await
        .expect("tick should resolve")
        .unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![Some(String::from("payload"))]);
}

#[tokio::test]
async fn tick_reports_missing_listeners_and_errors_separately() {
    let emitter = Emitter::new();
    let err = emitter.tick("idle", args!()).await.unwrap_err();
    assert!(matches!(err, EmitterError::NoListeners { .. }));

    emitter
        .on("broken", Listener::new(|_: &Args| Err::<(), _>("nope")))
        .unwrap();
    let err = emitter.tick("broken", args!()).await.unwrap_err();
    assert_eq!(err.listener_error().map(ToString::to_string).as_deref(), Some("nope"));
}

#[tokio::test]
async fn tick_on_destroyed_emitter_reaches_nobody() {
    let emitter = Emitter::new();
    emitter.on("x", Listener::new(|_: &Args| {})).unwrap();
    let pending = emitter.tick("x", args!());
    emitter.destroy();
    assert!(matches!(pending.await, Err(EmitterError::NoListeners { .. })));
}

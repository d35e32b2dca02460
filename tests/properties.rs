use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use nsemitter::{
    args, Args, Emitter, EmitterError, EventType, Listener, ListenerError, Snapshot, MAX_LISTENERS,
    WILDCARD,
};
use serde_json::json;

fn counter() -> (Arc<AtomicUsize>, Listener) {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);
    let listener = Listener::new(move |_: &Args| {
        c.fetch_add(1, Ordering::SeqCst);
    });
    (calls, listener)
}

#[test]
fn on_then_off_leaves_no_listeners() {
    let emitter = Emitter::new();
    for name in ["plain", "a:b", "error", ":on"] {
        let (_, f) = counter();
        emitter.on(name, f.clone()).unwrap();
        emitter.off(name, &f).unwrap();
        assert_eq!(emitter.listener_count(name), 0, "type {name}");
    }
    assert!(emitter.event_types().is_empty());
}

#[test]
fn dispatch_follows_subscription_order() {
    let emitter = Emitter::new();
    let order = Arc::new(Mutex::new(Vec::new()));
    for i in 0..8 {
        let o = Arc::clone(&order);
        emitter
            .on("tick", Listener::new(move |_: &Args| o.lock().unwrap().push(i)))
            .unwrap();
    }
    emitter.emit("tick", args!()).unwrap();
    assert_eq!(*order.lock().unwrap(), (0..8).collect::<Vec<_>>());
}

#[test]
fn once_runs_exactly_once() {
    let emitter = Emitter::new();
    let (calls, f) = counter();
    emitter.once("t", f).unwrap();

    assert!(emitter.emit("t", args!()).unwrap());
    assert!(!emitter.emit("t", args!()).unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn many_runs_exactly_n_times() {
    let emitter = Emitter::new();
    let (calls, f) = counter();
    emitter.many("t", 3, f).unwrap();
    for _ in 0..4 {
        emitter.emit("t", args!()).unwrap();
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn namespaced_dispatch_passes_same_args_most_specific_first() {
    let emitter = Emitter::new();
    let seen: Arc<Mutex<Vec<(&'static str, Vec<i32>)>>> = Arc::new(Mutex::new(Vec::new()));
    for name in ["a", "a:b", "a:b:c"] {
        let s = Arc::clone(&seen);
        emitter
            .on(
                name,
                Listener::new(move |args: &Args| {
                    let values = (0..args.len()).filter_map(|i| args.get::<i32>(i).copied()).collect();
                    s.lock().unwrap().push((name, values));
                }),
            )
            .unwrap();
    }

    assert!(emitter.emit("a:b:c", args!(1, 2, 3)).unwrap());
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            ("a:b:c", vec![1, 2, 3]),
            ("a:b", vec![1, 2, 3]),
            ("a", vec![1, 2, 3]),
        ]
    );
}

#[test]
fn unobserved_error_returns_the_emitted_error() {
    let emitter = Emitter::new();
    let given = ListenerError::msg("disk full");

    match emitter.emit("error", args!(given.clone())) {
        Err(EmitterError::Unhandled { source }) => assert!(source.ptr_eq(&given)),
        other => panic!("expected unhandled error, got {other:?}"),
    }
}

#[test]
fn unobserved_error_without_error_value_is_generic() {
    let emitter = Emitter::new();
    match emitter.emit("error", args!("not an error", 5)) {
        Err(EmitterError::Unhandled { source }) => {
            assert_eq!(source.to_string(), "Uncaught, unspecified 'error' event.");
        }
        other => panic!("expected unhandled error, got {other:?}"),
    }
}

#[test]
fn failing_listener_does_not_block_siblings() {
    let emitter = Emitter::new();
    let (errors, on_error) = counter();
    let (calls, second) = counter();
    emitter.on("error", on_error).unwrap();
    emitter
        .on("foo", Listener::new(|_: &Args| Err::<(), _>("first broke")))
        .unwrap();
    emitter.on("foo", second).unwrap();

    assert!(emitter.emit("foo", args!()).unwrap());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(errors.load(Ordering::SeqCst), 1);
}

#[test]
fn sibling_runs_even_when_failure_is_unhandled() {
    let emitter = Emitter::new();
    let (calls, second) = counter();
    emitter
        .on("foo", Listener::new(|_: &Args| Err::<(), _>("first broke")))
        .unwrap();
    emitter.on("foo", second).unwrap();

    assert!(emitter.emit("foo", args!()).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn max_listeners_alert_fires_once() {
    let emitter = Emitter::new();
    emitter.set_max_listeners(2);
    let (alerts, alert) = counter();
    emitter.on(MAX_LISTENERS, alert).unwrap();

    for _ in 0..3 {
        let (_, f) = counter();
        emitter.on("crowded", f).unwrap();
    }
    assert_eq!(alerts.load(Ordering::SeqCst), 1);

    let (_, f) = counter();
    emitter.on("crowded", f).unwrap();
    assert_eq!(alerts.load(Ordering::SeqCst), 1);
}

#[test]
fn destroyed_emitter_is_inert() {
    let emitter = Emitter::new();
    let (calls, f) = counter();
    emitter.on("t", f.clone()).unwrap();
    emitter.destroy();

    emitter.on("t", f.clone()).unwrap();
    assert!(!emitter.emit("t", args!()).unwrap());
    emitter.off("t", &f).unwrap();
    assert!(!emitter.emit("error", args!()).unwrap());

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(emitter.snapshot(), Snapshot::Destroyed);
    assert_eq!(emitter.snapshot().to_json(), json!("destroyed"));
}

#[test]
fn snapshot_counts_match_listener_count() {
    let emitter = Emitter::new();
    let (_, f) = counter();
    emitter.on("a", f.clone()).unwrap();
    emitter.on("a", f.clone()).unwrap();
    emitter.on("a:b", f.clone()).unwrap();
    emitter.once("c", f.clone()).unwrap();
    emitter.on_any(f).unwrap();

    let snapshot = emitter.snapshot();
    let json = snapshot.to_json();
    for event in emitter.event_types() {
        assert_eq!(snapshot.listener_count(&event), emitter.listener_count(&event));
        if let Some(name) = event.as_str() {
            assert_eq!(json["listenerCount"][name], json!(emitter.listener_count(&event)));
        }
    }
    assert_eq!(snapshot.listener_count(&EventType::Wildcard), 1);
    assert_eq!(emitter.listener_count(EventType::Wildcard), 1);
}

#[test]
fn star_named_type_and_wildcard_are_counted_apart() {
    let emitter = Emitter::new();
    let (_, f) = counter();
    emitter.on("*", f.clone()).unwrap();
    emitter.on(WILDCARD, f.clone()).unwrap();
    emitter.on(WILDCARD, f).unwrap();

    assert_eq!(emitter.listener_count("*"), 1);
    assert_eq!(emitter.listener_count(WILDCARD), 2);

    let json = emitter.snapshot().to_json();
    assert_eq!(json["listenerCount"], json!({ "*": 1 }));
    let text: serde_json::Value = serde_json::from_str(&emitter.to_string()).unwrap();
    assert_eq!(text, json);
}

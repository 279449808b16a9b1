use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use vitrine_state::Store;

#[derive(Debug, Clone, Default, PartialEq)]
struct Counter {
    value: i64,
    label: String,
}

#[derive(Debug, Clone)]
enum CounterAction {
    Add(i64),
    Set(i64),
}

fn reduce(mut state: Counter, action: CounterAction) -> Counter {
    match action {
        CounterAction::Add(n) => state.value += n,
        CounterAction::Set(n) => state.value = n,
    }
    state
}

#[test]
fn seed_override_is_applied_exactly_once_at_construction() {
    let store = Store::seeded(reduce, Counter::default(), |s| {
        s.label = "seeded".to_string();
    });

    assert_eq!(store.state().label, "seeded");
    assert_eq!(store.state().value, 0);

    // Later dispatches do not re-run the seed.
    store.dispatch(CounterAction::Add(2));
    assert_eq!(store.state().label, "seeded");
    assert_eq!(store.state().value, 2);
}

#[test]
fn subscribers_are_notified_synchronously_on_every_dispatch() {
    let store = Store::new(reduce, Counter::default());
    let seen = Arc::new(AtomicUsize::new(0));
    let seen_in_listener = seen.clone();

    store.subscribe(move |state: &Counter| {
        seen_in_listener.store(state.value as usize, Ordering::SeqCst);
    });

    store.dispatch(CounterAction::Add(3));
    assert_eq!(seen.load(Ordering::SeqCst), 3);

    store.dispatch(CounterAction::Add(4));
    assert_eq!(seen.load(Ordering::SeqCst), 7);
}

#[test]
fn middleware_intercepts_actions_instead_of_the_reducer() {
    // Clamp every Set to 10; pass everything else through.
    let store = Store::new(reduce, Counter::default()).with_middleware(Arc::new(
        |handle, action| match action {
            CounterAction::Set(n) => handle.forward(CounterAction::Set(n.min(10))),
            other => handle.forward(other),
        },
    ));

    store.dispatch(CounterAction::Set(99));
    assert_eq!(store.state().value, 10);

    store.dispatch(CounterAction::Add(1));
    assert_eq!(store.state().value, 11);
}

#[test]
fn cloned_handles_share_state() {
    let store = Store::new(reduce, Counter::default());
    let other = store.clone();

    store.dispatch(CounterAction::Add(5));
    assert_eq!(other.state().value, 5);
}

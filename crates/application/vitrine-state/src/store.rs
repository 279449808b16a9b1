use std::sync::{Arc, Mutex};

/// Pure state transition: `(state, action) -> state`.
pub type Reducer<S, A> = fn(S, A) -> S;

/// Middleware sees every dispatched action before the reducer does. It may
/// forward the action (possibly rewritten, possibly several) through the
/// handle, or swallow it entirely.
pub type Middleware<S, A> = Arc<dyn Fn(&StoreHandle<S, A>, A) + Send + Sync>;

type Listener<S> = Box<dyn FnMut(&S) + Send>;

struct Shared<S, A> {
    state: Mutex<S>,
    reducer: Reducer<S, A>,
    listeners: Mutex<Vec<Listener<S>>>,
}

/// An explicit state holder binding a pure reducer to a state value.
///
/// Cloning yields another handle onto the same state. Consumers receive the
/// handle by value (dependency injection); reads return snapshots, writes go
/// through `dispatch`. Listeners run synchronously after each applied action.
pub struct Store<S, A> {
    shared: Arc<Shared<S, A>>,
    middleware: Option<Middleware<S, A>>,
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
            middleware: self.middleware.clone(),
        }
    }
}

/// Forward-only view handed to middleware: actions sent through it reach the
/// reducer directly, bypassing the middleware itself.
pub struct StoreHandle<S, A> {
    shared: Arc<Shared<S, A>>,
}

impl<S: Clone, A> StoreHandle<S, A> {
    pub fn state(&self) -> S {
        self.shared.state.lock().expect("store state lock poisoned").clone()
    }

    pub fn forward(&self, action: A) {
        let snapshot = {
            let mut guard = self.shared.state.lock().expect("store state lock poisoned");
            let next = (self.shared.reducer)(guard.clone(), action);
            *guard = next;
            guard.clone()
        };
        // Listeners run outside the state lock so they may read the store.
        let mut listeners = self
            .shared
            .listeners
            .lock()
            .expect("store listeners lock poisoned");
        for listener in listeners.iter_mut() {
            listener(&snapshot);
        }
    }
}

impl<S: Clone, A> Store<S, A> {
    pub fn new(reducer: Reducer<S, A>, initial: S) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(initial),
                reducer,
                listeners: Mutex::new(Vec::new()),
            }),
            middleware: None,
        }
    }

    /// Like `new`, but applies `seed` to the initial state exactly once
    /// before the store becomes visible (the partial-override hook).
    pub fn seeded(reducer: Reducer<S, A>, mut initial: S, seed: impl FnOnce(&mut S)) -> Self {
        seed(&mut initial);
        Self::new(reducer, initial)
    }

    /// Route all subsequent dispatches through `middleware`.
    pub fn with_middleware(mut self, middleware: Middleware<S, A>) -> Self {
        self.middleware = Some(middleware);
        self
    }

    pub fn state(&self) -> S {
        self.shared.state.lock().expect("store state lock poisoned").clone()
    }

    pub fn dispatch(&self, action: A) {
        let handle = StoreHandle {
            shared: self.shared.clone(),
        };
        match &self.middleware {
            Some(mw) => mw(&handle, action),
            None => handle.forward(action),
        }
    }

    /// Register a listener invoked synchronously with the new state after
    /// every applied action. Listeners observe; they must not dispatch.
    pub fn subscribe(&self, listener: impl FnMut(&S) + Send + 'static) {
        self.shared
            .listeners
            .lock()
            .expect("store listeners lock poisoned")
            .push(Box::new(listener));
    }
}

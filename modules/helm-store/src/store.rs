//! The store: one state value, one dispatch pipeline, ordered subscribers.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use anyhow::{Context, Result};
use tracing::trace;

use crate::action::{Action, Envelope, Outcome};
use crate::error::StoreError;
use crate::middleware::{Middleware, Next};
use crate::traits::Reducer;

type SubscriberFn = Rc<dyn Fn()>;

struct StoreInner<S, A> {
    /// Committed state. `None` only while the bootstrap dispatch is in
    /// flight during [`StoreBuilder::build`].
    state: RefCell<Option<S>>,
    reducer: Box<dyn Reducer<S, A>>,
    /// Keyed by registration id, so removal never depends on position in a
    /// list that may have shifted.
    subscribers: RefCell<BTreeMap<u64, SubscriberFn>>,
    next_subscriber_id: Cell<u64>,
    /// First entry is the outermost link.
    middleware: Vec<Rc<dyn Middleware<S, A>>>,
}

/// Handle to the state container. Cloning is cheap and shares the store;
/// middleware and thunks receive this same handle, so any dispatch they
/// perform re-enters the full chain.
pub struct Store<S, A> {
    inner: Rc<StoreInner<S, A>>,
}

impl<S, A> std::fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Store {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: 'static, A: 'static> Store<S, A> {
    /// Build a store with no middleware and run the bootstrap dispatch.
    pub fn new(reducer: impl Reducer<S, A> + 'static) -> Result<Self> {
        Self::builder(reducer).build()
    }

    /// Start a builder. Middleware added via [`StoreBuilder::with`] wires
    /// outermost-first.
    pub fn builder(reducer: impl Reducer<S, A> + 'static) -> StoreBuilder<S, A> {
        StoreBuilder {
            reducer: Box::new(reducer),
            middleware: Vec::new(),
        }
    }

    /// Dispatch a plain application action through the full chain.
    pub fn dispatch(&self, action: A) -> Result<Outcome> {
        self.dispatch_envelope(Envelope::plain(action))
    }

    /// Dispatch a deferred computation. Requires [`ThunkMiddleware`] in the
    /// chain; without it the raw dispatch fails with
    /// [`StoreError::UnhandledThunk`].
    ///
    /// [`ThunkMiddleware`]: crate::middleware::ThunkMiddleware
    pub fn dispatch_thunk(
        &self,
        f: impl FnOnce(&Store<S, A>) -> Result<Outcome> + 'static,
    ) -> Result<Outcome> {
        self.dispatch_envelope(Envelope::thunk(f))
    }

    /// Dispatch a pre-built envelope through the full chain.
    pub fn dispatch_envelope(&self, envelope: Envelope<S, A>) -> Result<Outcome> {
        self.dispatch_at(0, envelope)
    }

    /// Continue the chain from the link at `index`. Past the last link sits
    /// the raw store dispatch.
    pub(crate) fn dispatch_at(&self, index: usize, envelope: Envelope<S, A>) -> Result<Outcome> {
        match self.inner.middleware.get(index) {
            Some(link) => {
                let link = Rc::clone(link);
                link.handle(self, envelope, Next::new(self, index + 1))
            }
            None => self.commit(envelope),
        }
    }

    /// The raw dispatch: run the transition function, replace the committed
    /// state, notify subscribers. Only this path ever replaces state.
    fn commit(&self, envelope: Envelope<S, A>) -> Result<Outcome> {
        let action = match envelope {
            Envelope::Plain(action) => action,
            Envelope::Thunk(_) => return Err(StoreError::UnhandledThunk.into()),
        };

        let next = {
            let prior = self.inner.state.borrow();
            self.inner.reducer.reduce(prior.as_ref(), &action)
        };
        *self.inner.state.borrow_mut() = Some(next);

        // Snapshot at commit time, then release the borrow before invoking
        // anything. A callback may unsubscribe, subscribe, or dispatch
        // re-entrantly; mutations take effect from the next dispatch.
        let snapshot: Vec<SubscriberFn> =
            self.inner.subscribers.borrow().values().cloned().collect();
        trace!(subscribers = snapshot.len(), "state committed");
        for subscriber in snapshot {
            (*subscriber)();
        }

        Ok(Outcome::Committed)
    }

    /// Borrow the committed state. `None` only when called from middleware
    /// while the bootstrap dispatch is still in flight. The closure must
    /// not dispatch — the state cell stays borrowed until it returns.
    pub fn with_state<T>(&self, f: impl FnOnce(Option<&S>) -> T) -> T {
        let state = self.inner.state.borrow();
        f(state.as_ref())
    }

    /// Register a notification callback. Callbacks fire with no arguments,
    /// in registration order, exactly once per committed dispatch, after
    /// the new state lands. The same closure registered twice holds two
    /// independent entries.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription<S, A> {
        let id = self.inner.next_subscriber_id.get();
        self.inner.next_subscriber_id.set(id + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .insert(id, Rc::new(callback));
        Subscription {
            store: Rc::downgrade(&self.inner),
            id,
        }
    }
}

impl<S: Clone + 'static, A: 'static> Store<S, A> {
    /// Clone of the committed state. See [`Store::with_state`] for when
    /// this is `None`.
    pub fn state(&self) -> Option<S> {
        self.with_state(|state| state.cloned())
    }
}

/// Registration handle returned by [`Store::subscribe`].
///
/// Removal is explicit — dropping the handle does not unsubscribe. Calling
/// [`Subscription::unsubscribe`] more than once is a no-op after the first.
pub struct Subscription<S, A> {
    store: Weak<StoreInner<S, A>>,
    id: u64,
}

impl<S, A> Subscription<S, A> {
    /// Remove exactly this registration.
    pub fn unsubscribe(&self) {
        if let Some(inner) = self.store.upgrade() {
            inner.subscribers.borrow_mut().remove(&self.id);
        }
    }
}

/// Builds a [`Store`], wiring middleware outermost-first.
pub struct StoreBuilder<S, A> {
    reducer: Box<dyn Reducer<S, A>>,
    middleware: Vec<Rc<dyn Middleware<S, A>>>,
}

impl<S: 'static, A: 'static> StoreBuilder<S, A> {
    /// Append a middleware link. The first link added sees every action
    /// first and wraps the effect of every later link.
    pub fn with(mut self, middleware: impl Middleware<S, A> + 'static) -> Self {
        self.middleware.push(Rc::new(middleware));
        self
    }

    /// Finish the store and run the bootstrap dispatch through the full
    /// chain so the reducer can establish initial state. Fails if a
    /// middleware absorbs the bootstrap action.
    pub fn build(self) -> Result<Store<S, A>> {
        let store = Store {
            inner: Rc::new(StoreInner {
                state: RefCell::new(None),
                reducer: self.reducer,
                subscribers: RefCell::new(BTreeMap::new()),
                next_subscriber_id: Cell::new(0),
                middleware: self.middleware,
            }),
        };

        store
            .dispatch_envelope(Envelope::Plain(Action::Bootstrap))
            .context("bootstrap dispatch")?;
        if store.with_state(|state| state.is_none()) {
            return Err(StoreError::BootstrapSkipped.into());
        }

        Ok(store)
    }
}

//! Middleware: dispatch interceptors composed outermost-first.

use anyhow::Result;

use crate::action::{Envelope, Outcome};
use crate::store::Store;

/// A dispatch interceptor.
///
/// `store` is the public handle — dispatching through it re-enters the full
/// chain, not just the remainder. `next` continues toward the raw store
/// dispatch; a link may transform the envelope, transform the result, or
/// drop `next` without calling it to absorb the action.
pub trait Middleware<S, A> {
    fn handle(
        &self,
        store: &Store<S, A>,
        envelope: Envelope<S, A>,
        next: Next<'_, S, A>,
    ) -> Result<Outcome>;
}

/// One-shot continuation for the rest of the chain.
pub struct Next<'a, S, A> {
    store: &'a Store<S, A>,
    index: usize,
}

impl<'a, S: 'static, A: 'static> Next<'a, S, A> {
    pub(crate) fn new(store: &'a Store<S, A>, index: usize) -> Self {
        Self { store, index }
    }

    /// Hand the envelope to the next link, or to the raw store dispatch at
    /// the end of the chain.
    pub fn call(self, envelope: Envelope<S, A>) -> Result<Outcome> {
        self.store.dispatch_at(self.index, envelope)
    }
}

/// Deferred-dispatch middleware.
///
/// Runs [`Envelope::Thunk`] payloads against the store handle instead of
/// sending them to the transition function; the thunk's return value
/// becomes the dispatch result and `next` is never called. Plain envelopes
/// pass through untouched. This is the one escape hatch for "compute now,
/// decide how or whether to dispatch based on current state, possibly
/// later".
pub struct ThunkMiddleware;

impl<S: 'static, A: 'static> Middleware<S, A> for ThunkMiddleware {
    fn handle(
        &self,
        store: &Store<S, A>,
        envelope: Envelope<S, A>,
        next: Next<'_, S, A>,
    ) -> Result<Outcome> {
        match envelope {
            Envelope::Thunk(thunk) => thunk(store),
            plain => next.call(plain),
        }
    }
}

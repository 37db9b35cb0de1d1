//! Actions and the envelopes that carry them through dispatch.

use anyhow::Result;
use serde::Serialize;

use crate::store::Store;

/// An action as seen by the transition function.
///
/// `Bootstrap` is the reserved sentinel dispatched once at store creation so
/// the reducer can establish initial state from an absent prior. It is
/// structurally distinct from every application action, so it can never
/// collide with one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "action")]
pub enum Action<A> {
    Bootstrap,
    App(A),
}

/// A deferred computation dispatched in place of a plain action.
///
/// Receives the public store handle, so it can read committed state and
/// dispatch follow-up actions — each one a full, independent dispatch cycle.
/// Its return value becomes the result of the dispatch that carried it.
pub type Thunk<S, A> = Box<dyn FnOnce(&Store<S, A>) -> Result<Outcome>>;

/// What `dispatch` routes through the middleware chain: either a plain
/// action record or a thunk. The deferred-dispatch branch is a structural
/// match on this type, not a runtime capability probe.
pub enum Envelope<S, A> {
    Plain(Action<A>),
    Thunk(Thunk<S, A>),
}

impl<S: 'static, A: 'static> Envelope<S, A> {
    /// Wrap an application action.
    pub fn plain(action: A) -> Self {
        Envelope::Plain(Action::App(action))
    }

    /// Wrap a deferred computation.
    pub fn thunk(f: impl FnOnce(&Store<S, A>) -> Result<Outcome> + 'static) -> Self {
        Envelope::Thunk(Box::new(f))
    }
}

/// What a dispatch ultimately did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The transition function ran and subscribers were notified.
    Committed,
    /// A middleware or thunk absorbed the action before it reached the
    /// raw store dispatch.
    Intercepted,
}

//! Core traits for the state container.

use crate::action::Action;

/// Pure state transitions. No I/O, no side effects.
///
/// `prior` is `None` only for the bootstrap dispatch at store creation; the
/// reducer must produce a defined initial state in that case. Actions it
/// does not recognize must return the prior state unchanged — the slice
/// combinator in `helm-combine` relies on this.
pub trait Reducer<S, A> {
    fn reduce(&self, prior: Option<&S>, action: &Action<A>) -> S;
}

/// Closures with the right shape are reducers.
impl<S, A, F> Reducer<S, A> for F
where
    F: Fn(Option<&S>, &Action<A>) -> S,
{
    fn reduce(&self, prior: Option<&S>, action: &Action<A>) -> S {
        self(prior, action)
    }
}

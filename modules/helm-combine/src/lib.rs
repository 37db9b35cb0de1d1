//! Slice combinator: one reducer per named slice, fanned out into a single
//! reducer over a map keyed the same way.
//!
//! Every slice reducer sees every action unchanged and receives only its own
//! slice's prior state, so a slice's value changes only when its own reducer
//! changes it. Relies on reducers returning prior state unchanged for
//! actions they do not recognize, and seeding their slice when prior is
//! absent (the bootstrap dispatch).

use std::collections::BTreeMap;

use helm_store::{Action, Reducer};

/// Named per-slice reducers, combined into one reducer over
/// `BTreeMap<String, S>`.
pub struct SliceReducers<S, A> {
    slices: Vec<(String, Box<dyn Reducer<S, A>>)>,
}

impl<S, A> SliceReducers<S, A> {
    pub fn new() -> Self {
        Self { slices: Vec::new() }
    }

    /// Register `reducer` for the slice named `name`.
    pub fn with(mut self, name: impl Into<String>, reducer: impl Reducer<S, A> + 'static) -> Self {
        self.slices.push((name.into(), Box::new(reducer)));
        self
    }
}

impl<S, A> Default for SliceReducers<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A> Reducer<BTreeMap<String, S>, A> for SliceReducers<S, A> {
    fn reduce(&self, prior: Option<&BTreeMap<String, S>>, action: &Action<A>) -> BTreeMap<String, S> {
        self.slices
            .iter()
            .map(|(name, reducer)| {
                let slice_prior = prior.and_then(|state| state.get(name));
                (name.clone(), reducer.reduce(slice_prior, action))
            })
            .collect()
    }
}

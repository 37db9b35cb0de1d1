//! Single-writer state container with middleware interception.
//!
//! One authoritative state value, replaced only by dispatching actions
//! through the store. Subscribers are notified synchronously after every
//! commit, in registration order. Middleware wraps dispatch to observe,
//! transform, or absorb actions before they reach the transition function.
//!
//! Consumers provide a [`Reducer`] (pure state transitions) and optionally
//! a stack of [`Middleware`] links wired outermost-first via
//! [`Store::builder`].
//!
//! Single-threaded by design: every dispatch runs to completion on the
//! calling thread, and re-entrant dispatch from a subscriber or middleware
//! is legal and well-defined.

pub mod action;
pub mod error;
pub mod log;
pub mod middleware;
pub mod store;
pub mod traits;

pub use action::{Action, Envelope, Outcome, Thunk};
pub use error::StoreError;
pub use log::{LogPhase, LogRecord, LogSink, LoggingMiddleware, MemoryLogSink, TracingLogSink};
pub use middleware::{Middleware, Next, ThunkMiddleware};
pub use store::{Store, StoreBuilder, Subscription};
pub use traits::Reducer;

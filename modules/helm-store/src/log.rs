//! Logging middleware and its sink.
//!
//! Diagnostic output goes through an injected [`LogSink`], so tests capture
//! records directly instead of intercepting a global channel.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use crate::action::{Envelope, Outcome};
use crate::middleware::{Middleware, Next};
use crate::store::Store;

/// Where a record sits relative to the dispatch it describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogPhase {
    Before,
    Action,
    After,
}

/// One observability record. An active logger writes exactly three per
/// dispatch: state before, the action, state after.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub ts: DateTime<Utc>,
    pub phase: LogPhase,
    pub payload: serde_json::Value,
}

impl LogRecord {
    fn new(phase: LogPhase, payload: serde_json::Value) -> Self {
        Self {
            ts: Utc::now(),
            phase,
            payload,
        }
    }
}

/// Receives records from the logging middleware.
pub trait LogSink {
    fn write(&self, record: LogRecord);
}

/// Forwards records to `tracing` at debug level.
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn write(&self, record: LogRecord) {
        tracing::debug!(phase = ?record.phase, payload = %record.payload, "dispatch");
    }
}

/// In-memory sink for tests. Share it via `Rc` to read records back.
#[derive(Default)]
pub struct MemoryLogSink {
    records: RefCell<Vec<LogRecord>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records written so far (for assertions).
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.borrow().clone()
    }
}

impl LogSink for MemoryLogSink {
    fn write(&self, record: LogRecord) {
        self.records.borrow_mut().push(record);
    }
}

/// Shared sinks — lets tests keep a handle for assertions.
impl<T: LogSink + ?Sized> LogSink for Rc<T> {
    fn write(&self, record: LogRecord) {
        (**self).write(record);
    }
}

/// Pass-through middleware that records state before, the action, and state
/// after each dispatch. Inactive, it writes nothing and forwards the
/// envelope untouched. Never alters the envelope or the outcome.
pub struct LoggingMiddleware<K: LogSink> {
    active: bool,
    sink: K,
}

impl<K: LogSink> LoggingMiddleware<K> {
    pub fn new(active: bool, sink: K) -> Self {
        Self { active, sink }
    }
}

impl<S, A, K> Middleware<S, A> for LoggingMiddleware<K>
where
    S: Serialize + 'static,
    A: Serialize + 'static,
    K: LogSink,
{
    fn handle(
        &self,
        store: &Store<S, A>,
        envelope: Envelope<S, A>,
        next: Next<'_, S, A>,
    ) -> Result<Outcome> {
        if !self.active {
            return next.call(envelope);
        }

        self.sink
            .write(LogRecord::new(LogPhase::Before, state_payload(store)?));
        self.sink
            .write(LogRecord::new(LogPhase::Action, action_payload(&envelope)?));
        let outcome = next.call(envelope)?;
        self.sink
            .write(LogRecord::new(LogPhase::After, state_payload(store)?));
        Ok(outcome)
    }
}

/// Committed state as JSON; `null` before the bootstrap commit.
fn state_payload<S: Serialize + 'static, A: 'static>(
    store: &Store<S, A>,
) -> Result<serde_json::Value> {
    store.with_state(|state| match state {
        Some(s) => Ok(serde_json::to_value(s)?),
        None => Ok(serde_json::Value::Null),
    })
}

/// The action as JSON. Thunks are opaque, so they log a placeholder.
fn action_payload<S, A: Serialize>(envelope: &Envelope<S, A>) -> Result<serde_json::Value> {
    match envelope {
        Envelope::Plain(action) => Ok(serde_json::to_value(action)?),
        Envelope::Thunk(_) => Ok(json!({ "type": "thunk" })),
    }
}

//! # Event Sinks
//!
//! - `InMemoryEventLog`: append-only log, readable by tests and auditors
//! - `TracingEventSink`: writes each event as a structured `tracing` record
//! - `NoopEventSink`: discards everything

use crate::events::LedgerEvent;
use crate::ports::outbound::EventSink;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;

/// Append-only in-memory event log.
#[derive(Default)]
pub struct InMemoryEventLog {
    events: Mutex<Vec<LedgerEvent>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every event published so far, in publication order.
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events.lock().clone()
    }

    /// Names of published events, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(|e| e.kind.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for InMemoryEventLog {
    fn publish(&self, event: LedgerEvent) {
        self.events.lock().push(event);
    }
}

/// Logs events at `info` under the `review_ledger::events` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn publish(&self, event: LedgerEvent) {
        info!(
            target: "review_ledger::events",
            sequence = event.sequence,
            correlation_id = %event.correlation_id,
            event = event.kind.name(),
            detail = ?event.kind,
            "ledger event"
        );
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn publish(&self, _event: LedgerEvent) {}
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn publish(&self, event: LedgerEvent) {
        (**self).publish(event);
    }
}

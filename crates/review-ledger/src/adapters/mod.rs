//! # Adapters Layer
//!
//! Concrete implementations of the outbound ports.

pub mod event_sink;
pub mod memory_storage;

pub use event_sink::{InMemoryEventLog, NoopEventSink, TracingEventSink};
pub use memory_storage::{InMemoryStorage, DEFAULT_STORAGE_TIMEOUT};

//! # Driven Ports (SPI - Outbound)
//!
//! Interfaces the ledger depends on. Adapters implement these traits to provide:
//! - Durable storage (get/commit/scan by address)
//! - Event publication for audit ordering
//!
//! ## Architecture Compliance
//!
//! - Dependencies point INWARD (adapters implement these traits)
//! - The core never names a concrete storage engine

use crate::errors::StorageError;
use crate::events::LedgerEvent;
use shared_types::Address;

// =============================================================================
// STORAGE
// =============================================================================

/// Bytes stored at an address plus the version that wrote them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredEntry {
    pub version: u64,
    pub data: Vec<u8>,
}

/// Precondition attached to every write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expectation {
    /// Address must be empty.
    Absent,
    /// Address must currently hold exactly this version.
    Version(u64),
}

impl std::fmt::Display for Expectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absent => f.write_str("absent"),
            Self::Version(v) => write!(f, "version {v}"),
        }
    }
}

/// A single guarded write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteOp {
    /// Insert or overwrite.
    Put {
        address: Address,
        expected: Expectation,
        data: Vec<u8>,
    },
    /// Remove an existing entry at exactly `expected` version.
    Delete { address: Address, expected: u64 },
}

impl WriteOp {
    #[must_use]
    pub fn address(&self) -> Address {
        match self {
            Self::Put { address, .. } | Self::Delete { address, .. } => *address,
        }
    }

    #[must_use]
    pub fn expectation(&self) -> Expectation {
        match self {
            Self::Put { expected, .. } => *expected,
            Self::Delete { expected, .. } => Expectation::Version(*expected),
        }
    }
}

/// Writes committed all-or-nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a put guarded by `expected`.
    #[must_use]
    pub fn put(mut self, address: Address, expected: Expectation, data: Vec<u8>) -> Self {
        self.ops.push(WriteOp::Put {
            address,
            expected,
            data,
        });
        self
    }

    /// Add a delete guarded by `expected`.
    #[must_use]
    pub fn delete(mut self, address: Address, expected: u64) -> Self {
        self.ops.push(WriteOp::Delete { address, expected });
        self
    }

    #[must_use]
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    #[must_use]
    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

/// Outcome of a committed batch: new version per written address
/// (`None` for deletes), in batch order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommitReceipt {
    pub versions: Vec<(Address, Option<u64>)>,
}

impl CommitReceipt {
    /// Version written at `address`, if the batch put one there.
    #[must_use]
    pub fn version_of(&self, address: &Address) -> Option<u64> {
        self.versions
            .iter()
            .find(|(a, _)| a == address)
            .and_then(|(_, v)| *v)
    }
}

/// Durable storage backend.
///
/// ## Guarantees Required of Implementations
///
/// 1. `commit` is atomic: either every op applies or none does.
/// 2. Every expectation is checked against the state at commit time.
/// 3. Versions are strictly increasing across the whole store, so a
///    re-created address never reuses an older version.
/// 4. Every call returns within a bounded time (`StorageError::Timeout`).
pub trait LedgerStorage: Send + Sync {
    /// Read the entry at `address`.
    fn get(&self, address: &Address) -> Result<Option<StoredEntry>, StorageError>;

    /// Apply `batch` atomically.
    fn commit(&self, batch: WriteBatch) -> Result<CommitReceipt, StorageError>;

    /// Snapshot of every entry at call time, in no particular order.
    fn scan(&self) -> Result<Vec<(Address, StoredEntry)>, StorageError>;
}

impl<T: LedgerStorage + ?Sized> LedgerStorage for std::sync::Arc<T> {
    fn get(&self, address: &Address) -> Result<Option<StoredEntry>, StorageError> {
        (**self).get(address)
    }

    fn commit(&self, batch: WriteBatch) -> Result<CommitReceipt, StorageError> {
        (**self).commit(batch)
    }

    fn scan(&self) -> Result<Vec<(Address, StoredEntry)>, StorageError> {
        (**self).scan()
    }
}

// =============================================================================
// EVENTS
// =============================================================================

/// Receiver of committed-state notifications.
pub trait EventSink: Send + Sync {
    /// Publish one event. Must not block on slow consumers.
    fn publish(&self, event: LedgerEvent);
}

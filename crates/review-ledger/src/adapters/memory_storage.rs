//! # In-Memory Storage
//!
//! `LedgerStorage` over a `HashMap` guarded by a `parking_lot::RwLock`.
//!
//! Every lock acquisition is timed: a backend that cannot be locked within
//! `lock_timeout` reports `StorageError::Timeout` instead of blocking.

use crate::errors::StorageError;
use crate::ports::outbound::{
    CommitReceipt, Expectation, LedgerStorage, StoredEntry, WriteBatch, WriteOp,
};
use parking_lot::RwLock;
use shared_types::Address;
use std::collections::HashMap;
use std::time::Duration;

/// Default lock wait bound.
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_millis(250);

#[derive(Default)]
struct State {
    entries: HashMap<Address, StoredEntry>,
    /// Last version handed out. Never reset, so versions stay unique
    /// across delete and re-create.
    last_version: u64,
}

/// In-memory ledger storage for tests and single-process deployments.
pub struct InMemoryStorage {
    state: RwLock<State>,
    lock_timeout: Duration,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_STORAGE_TIMEOUT)
    }

    pub fn with_timeout(lock_timeout: Duration) -> Self {
        Self {
            state: RwLock::new(State::default()),
            lock_timeout,
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn timeout(&self) -> StorageError {
        StorageError::Timeout {
            waited_ms: self.lock_timeout.as_millis() as u64,
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn check(address: Address, expected: Expectation, actual: Option<u64>) -> Result<(), StorageError> {
    let holds = match (expected, actual) {
        (Expectation::Absent, None) => true,
        (Expectation::Version(want), Some(have)) => want == have,
        _ => false,
    };
    if holds {
        Ok(())
    } else {
        Err(StorageError::VersionMismatch {
            address,
            expected: expected.to_string(),
            actual,
        })
    }
}

impl LedgerStorage for InMemoryStorage {
    fn get(&self, address: &Address) -> Result<Option<StoredEntry>, StorageError> {
        let state = self
            .state
            .try_read_for(self.lock_timeout)
            .ok_or_else(|| self.timeout())?;
        Ok(state.entries.get(address).cloned())
    }

    fn commit(&self, batch: WriteBatch) -> Result<CommitReceipt, StorageError> {
        let mut state = self
            .state
            .try_write_for(self.lock_timeout)
            .ok_or_else(|| self.timeout())?;

        // Stage against an overlay so later ops in the batch see earlier ones
        // and nothing touches `entries` until every expectation holds.
        let mut staged: HashMap<Address, Option<StoredEntry>> = HashMap::new();
        let mut receipt = CommitReceipt::default();
        let mut next_version = state.last_version;

        for op in batch.into_ops() {
            let address = op.address();
            let current = match staged.get(&address) {
                Some(entry) => entry.as_ref().map(|e| e.version),
                None => state.entries.get(&address).map(|e| e.version),
            };
            check(address, op.expectation(), current)?;

            match op {
                WriteOp::Put { data, .. } => {
                    next_version += 1;
                    staged.insert(
                        address,
                        Some(StoredEntry {
                            version: next_version,
                            data,
                        }),
                    );
                    receipt.versions.push((address, Some(next_version)));
                }
                WriteOp::Delete { .. } => {
                    staged.insert(address, None);
                    receipt.versions.push((address, None));
                }
            }
        }

        for (address, entry) in staged {
            match entry {
                Some(entry) => {
                    state.entries.insert(address, entry);
                }
                None => {
                    state.entries.remove(&address);
                }
            }
        }
        state.last_version = next_version;

        Ok(receipt)
    }

    fn scan(&self) -> Result<Vec<(Address, StoredEntry)>, StorageError> {
        let state = self
            .state
            .try_read_for(self.lock_timeout)
            .ok_or_else(|| self.timeout())?;
        Ok(state
            .entries
            .iter()
            .map(|(address, entry)| (*address, entry.clone()))
            .collect())
    }
}

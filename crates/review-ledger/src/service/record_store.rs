//! # Record Store
//!
//! CRUD over review records. Every write is a single guarded commit:
//! inserts expect `Absent`, updates and deletes expect the version that was
//! read. Address-level serialization is the dispatcher's job.

use super::load_versioned;
use crate::domain::address::AddressDeriver;
use crate::domain::codec::{self, is_type};
use crate::domain::entities::{Record, ReviewLimits, Versioned};
use crate::domain::invariants::{
    check_address_invariant, check_identity_preserved, ReviewDraft, ReviewPatch,
};
use crate::errors::{LedgerError, LedgerResult, StorageError};
use crate::ports::outbound::{Expectation, LedgerStorage, WriteBatch};
use shared_types::{Address, Identity};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

const WHAT: &str = "review";

pub struct RecordStore<S: LedgerStorage> {
    storage: Arc<S>,
    deriver: AddressDeriver,
    limits: ReviewLimits,
    /// Delete attempts made by `remove_inserted` before giving up.
    max_attempts: u32,
}

impl<S: LedgerStorage> RecordStore<S> {
    pub fn new(
        storage: Arc<S>,
        deriver: AddressDeriver,
        limits: ReviewLimits,
        max_attempts: u32,
    ) -> Self {
        Self {
            storage,
            deriver,
            limits,
            max_attempts,
        }
    }

    pub fn limits(&self) -> &ReviewLimits {
        &self.limits
    }

    /// Validate `draft` and compute its address without touching storage.
    pub fn prepare(&self, owner: &Identity, draft: &ReviewDraft) -> LedgerResult<Address> {
        draft.validate(&self.limits)?;
        self.deriver.review_address(owner, &draft.title)
    }

    /// Insert a new record owned by `owner`.
    pub fn create(&self, owner: Identity, draft: ReviewDraft) -> LedgerResult<Versioned<Record>> {
        let address = self.prepare(&owner, &draft)?;
        if self.storage.get(&address)?.is_some() {
            return Err(LedgerError::AlreadyExists { address });
        }

        let record = Record {
            address,
            owner,
            title: draft.title,
            description: draft.description,
            rating: draft.rating,
            incarnation: Uuid::new_v4(),
        };
        let batch = WriteBatch::new().put(address, Expectation::Absent, codec::encode(&record)?);
        let receipt = match self.storage.commit(batch) {
            Ok(receipt) => receipt,
            // Occupied between the pre-read and the commit.
            Err(StorageError::VersionMismatch {
                actual: Some(_), ..
            }) => return Err(LedgerError::AlreadyExists { address }),
            Err(e) => return Err(e.into()),
        };
        let version = receipt
            .version_of(&address)
            .ok_or_else(|| LedgerError::Storage(format!("no version returned for {address}")))?;

        debug!(%address, version, "record inserted");
        Ok(Versioned {
            value: record,
            version,
        })
    }

    pub fn read(&self, address: &Address) -> LedgerResult<Record> {
        self.read_versioned(address).map(|v| v.value)
    }

    /// Read together with the storage version. A re-created record always
    /// carries a greater version than any earlier record at the same address.
    ///
    /// Fails with `AddressMismatch` if the stored record does not sit at
    /// `derive("review", title, owner)`.
    pub fn read_versioned(&self, address: &Address) -> LedgerResult<Versioned<Record>> {
        let current =
            load_versioned::<Record, S>(&self.storage, address)?.ok_or(LedgerError::NotFound {
                address: *address,
                what: WHAT,
            })?;
        if current.value.address != *address
            || !check_address_invariant(&current.value, &self.deriver)
        {
            return Err(LedgerError::AddressMismatch { address: *address });
        }
        Ok(current)
    }

    /// Replace description and rating of a record `caller` owns.
    pub fn update(
        &self,
        address: &Address,
        caller: &Identity,
        patch: &ReviewPatch,
    ) -> LedgerResult<Versioned<Record>> {
        let current = self.read_versioned(address)?;
        ensure_owner(&current.value, caller)?;
        patch.validate(&self.limits)?;

        let mut updated = current.value.clone();
        patch.apply_to(&mut updated);
        if !check_identity_preserved(&current.value, &updated) {
            return Err(LedgerError::Storage(format!(
                "update would rewrite identity of {address}"
            )));
        }

        let batch = WriteBatch::new().put(
            *address,
            Expectation::Version(current.version),
            codec::encode(&updated)?,
        );
        let receipt = self.storage.commit(batch)?;
        let version = receipt
            .version_of(address)
            .ok_or_else(|| LedgerError::Storage(format!("no version returned for {address}")))?;

        Ok(Versioned {
            value: updated,
            version,
        })
    }

    /// Remove a record `caller` owns. Returns the removed record.
    pub fn delete(&self, address: &Address, caller: &Identity) -> LedgerResult<Record> {
        let current = self.read_versioned(address)?;
        ensure_owner(&current.value, caller)?;
        self.storage
            .commit(WriteBatch::new().delete(*address, current.version))?;
        Ok(current.value)
    }

    /// Undo an insert made by `create`.
    ///
    /// Matches on the record's incarnation, so updates committed since the
    /// insert do not hide it. Returns `Ok(false)` when that incarnation is
    /// no longer stored (deleted, or replaced by a re-create).
    pub fn remove_inserted(&self, address: &Address, incarnation: &Uuid) -> LedgerResult<bool> {
        for attempt in 1..=self.max_attempts {
            let Some(current) = load_versioned::<Record, S>(&self.storage, address)? else {
                return Ok(false);
            };
            if current.value.incarnation != *incarnation {
                return Ok(false);
            }
            match self
                .storage
                .commit(WriteBatch::new().delete(*address, current.version))
            {
                Ok(_) => return Ok(true),
                Err(StorageError::VersionMismatch { .. }) => {
                    debug!(%address, attempt, "record changed during rollback, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(LedgerError::Conflict {
            address: *address,
            reason: format!("record not removed after {} attempts", self.max_attempts),
        })
    }

    /// Snapshot of every record at call time.
    ///
    /// The storage scan happens up front; decoding is lazy. Entries of other
    /// account types are skipped.
    pub fn list(&self) -> LedgerResult<RecordIter> {
        let entries = self.storage.scan()?;
        Ok(RecordIter {
            inner: entries.into_iter(),
        })
    }

    /// Snapshot of records owned by `owner`.
    pub fn list_by_owner(&self, owner: &Identity) -> LedgerResult<Vec<Record>> {
        self.list()?
            .filter(|r| r.as_ref().map_or(true, |r| r.owner == *owner))
            .collect()
    }
}

fn ensure_owner(record: &Record, caller: &Identity) -> LedgerResult<()> {
    if record.owner != *caller {
        return Err(LedgerError::Unauthorized {
            caller: *caller,
            expected: record.owner,
        });
    }
    Ok(())
}

/// Finite, restartable iterator over a storage snapshot.
pub struct RecordIter {
    inner: std::vec::IntoIter<(Address, crate::ports::outbound::StoredEntry)>,
}

impl Iterator for RecordIter {
    type Item = LedgerResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        for (address, entry) in self.inner.by_ref() {
            if is_type::<Record>(&entry.data) {
                return Some(codec::decode(&address, &entry.data));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.inner.len()))
    }
}

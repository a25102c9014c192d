//! # Address Locks
//!
//! Striped table of `parking_lot::RwLock<()>` giving "single logical writer
//! per address" inside one service instance.
//!
//! - Writers lock every stripe their operation touches, in ascending stripe
//!   order with duplicates removed, so two writers never wait on each other
//!   in opposite orders.
//! - Readers take one shared stripe.
//! - Every wait is bounded; a timeout becomes `LedgerError::Conflict`.
//!
//! Two addresses may share a stripe. That only costs parallelism.

use crate::errors::{LedgerError, LedgerResult};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use shared_types::Address;
use std::time::Duration;

pub struct AddressLocks {
    stripes: Vec<RwLock<()>>,
    timeout: Duration,
}

/// Exclusive guards held for the duration of a mutation.
pub struct WriteGuards<'a> {
    _guards: Vec<RwLockWriteGuard<'a, ()>>,
}

impl AddressLocks {
    /// `stripes` is clamped to at least one.
    pub fn new(stripes: usize, timeout: Duration) -> Self {
        let stripes = stripes.max(1);
        Self {
            stripes: (0..stripes).map(|_| RwLock::new(())).collect(),
            timeout,
        }
    }

    pub fn stripe_count(&self) -> usize {
        self.stripes.len()
    }

    fn stripe_of(&self, address: &Address) -> usize {
        (address.prefix_u64() % self.stripes.len() as u64) as usize
    }

    fn busy(&self, address: Address) -> LedgerError {
        LedgerError::Conflict {
            address,
            reason: format!("address busy for {}ms", self.timeout.as_millis()),
        }
    }

    /// Lock every stripe covering `addresses` exclusively.
    pub fn write(&self, addresses: &[Address]) -> LedgerResult<WriteGuards<'_>> {
        let mut wanted: Vec<(usize, Address)> = addresses
            .iter()
            .map(|a| (self.stripe_of(a), *a))
            .collect();
        wanted.sort_by_key(|(stripe, _)| *stripe);
        wanted.dedup_by_key(|(stripe, _)| *stripe);

        let mut guards = Vec::with_capacity(wanted.len());
        for (stripe, address) in wanted {
            // On timeout, guards taken so far drop here.
            let guard = self.stripes[stripe]
                .try_write_for(self.timeout)
                .ok_or_else(|| self.busy(address))?;
            guards.push(guard);
        }
        Ok(WriteGuards { _guards: guards })
    }

    /// Lock the stripe covering `address` for reading.
    pub fn read(&self, address: &Address) -> LedgerResult<RwLockReadGuard<'_, ()>> {
        self.stripes[self.stripe_of(address)]
            .try_read_for(self.timeout)
            .ok_or_else(|| self.busy(*address))
    }
}

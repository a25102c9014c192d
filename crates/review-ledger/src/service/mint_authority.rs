//! # Reward Mint Authority
//!
//! Owns the singleton `RewardMint` and is the only writer of balances.
//!
//! ## Credit Protocol
//!
//! A credit reads the mint and the target account, checks the signer,
//! computes both increments with checked addition, then commits supply and
//! balance in ONE batch guarded by the versions it read. A lost race shows
//! up as `VersionMismatch` and the whole read-validate-commit step is
//! retried, so no increment is ever computed from a stale balance.

use super::load_versioned;
use crate::domain::address::AddressDeriver;
use crate::domain::codec;
use crate::domain::entities::{RewardAccount, RewardMint, Versioned};
use crate::domain::invariants::checked_credit;
use crate::errors::{LedgerError, LedgerResult, StorageError};
use crate::ports::outbound::{Expectation, LedgerStorage, WriteBatch};
use shared_types::{Address, Identity};
use std::sync::Arc;
use tracing::debug;

/// Account a credit is applied to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreditTarget {
    /// An existing account. Missing accounts fail with `NotFound`.
    Account(Address),
    /// The owner's derived account, opened at zero balance in the same
    /// batch if it does not exist yet.
    Owner(Identity),
}

/// Committed result of a credit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreditReceipt {
    pub account: RewardAccount,
    pub amount: u64,
    pub supply: u64,
    /// True if this credit created the account.
    pub opened: bool,
}

pub struct MintAuthority<S: LedgerStorage> {
    storage: Arc<S>,
    deriver: AddressDeriver,
    mint_address: Address,
    max_attempts: u32,
}

impl<S: LedgerStorage> MintAuthority<S> {
    pub fn new(storage: Arc<S>, deriver: AddressDeriver, max_attempts: u32) -> LedgerResult<Self> {
        let mint_address = deriver.mint_address()?;
        Ok(Self {
            storage,
            deriver,
            mint_address,
            max_attempts: max_attempts.max(1),
        })
    }

    pub fn mint_address(&self) -> Address {
        self.mint_address
    }

    /// Address of `owner`'s reward account under this mint.
    pub fn account_address(&self, owner: &Identity) -> LedgerResult<Address> {
        self.deriver
            .reward_account_address(&self.mint_address, owner)
    }

    /// Create the mint. A second call fails with `AlreadyExists` and leaves
    /// authority and decimals untouched.
    pub fn initialize(&self, authority: Identity, decimals: u8) -> LedgerResult<RewardMint> {
        let address = self.mint_address;
        if self.storage.get(&address)?.is_some() {
            return Err(LedgerError::AlreadyExists { address });
        }
        let mint = RewardMint {
            address,
            authority,
            decimals,
            supply: 0,
        };
        let batch = WriteBatch::new().put(address, Expectation::Absent, codec::encode(&mint)?);
        match self.storage.commit(batch) {
            Ok(_) => Ok(mint),
            Err(StorageError::VersionMismatch {
                actual: Some(_), ..
            }) => Err(LedgerError::AlreadyExists { address }),
            Err(e) => Err(e.into()),
        }
    }

    /// Current mint state. `NotFound` until initialized.
    pub fn load(&self) -> LedgerResult<Versioned<RewardMint>> {
        load_versioned::<RewardMint, S>(&self.storage, &self.mint_address)?.ok_or(
            LedgerError::NotFound {
                address: self.mint_address,
                what: "reward mint",
            },
        )
    }

    /// `owner`'s account, if one has been opened.
    pub fn reward_account(&self, owner: &Identity) -> LedgerResult<Option<RewardAccount>> {
        let address = self.account_address(owner)?;
        Ok(load_versioned::<RewardAccount, S>(&self.storage, &address)?.map(|v| v.value))
    }

    /// Credit `amount` to an existing account. Only the mint's authority
    /// may sign.
    pub fn mint_to(
        &self,
        signer: &Identity,
        account: Address,
        amount: u64,
    ) -> LedgerResult<CreditReceipt> {
        self.credit(signer, CreditTarget::Account(account), amount)
    }

    /// Retry loop around a single read-validate-commit credit.
    pub fn credit(
        &self,
        signer: &Identity,
        target: CreditTarget,
        amount: u64,
    ) -> LedgerResult<CreditReceipt> {
        for attempt in 1..=self.max_attempts {
            match self.try_credit(signer, target, amount) {
                Err(LedgerError::Conflict { address, reason }) if attempt < self.max_attempts => {
                    debug!(attempt, %address, %reason, "credit raced, retrying");
                }
                other => return other,
            }
        }
        Err(LedgerError::Conflict {
            address: self.mint_address,
            reason: format!("credit not committed after {} attempts", self.max_attempts),
        })
    }

    fn try_credit(
        &self,
        signer: &Identity,
        target: CreditTarget,
        amount: u64,
    ) -> LedgerResult<CreditReceipt> {
        let mint = self.load()?;
        if mint.value.authority != *signer {
            return Err(LedgerError::Unauthorized {
                caller: *signer,
                expected: mint.value.authority,
            });
        }

        let (account, expectation, opened) = match target {
            CreditTarget::Account(address) => {
                let current = load_versioned::<RewardAccount, S>(&self.storage, &address)?
                    .ok_or(LedgerError::NotFound {
                        address,
                        what: "reward account",
                    })?;
                (current.value, Expectation::Version(current.version), false)
            }
            CreditTarget::Owner(owner) => {
                let address = self.account_address(&owner)?;
                match load_versioned::<RewardAccount, S>(&self.storage, &address)? {
                    Some(current) => (current.value, Expectation::Version(current.version), false),
                    None => (
                        RewardAccount::empty(address, self.mint_address, owner),
                        Expectation::Absent,
                        true,
                    ),
                }
            }
        };

        let balance = checked_credit("balance", account.balance, amount)?;
        let supply = checked_credit("supply", mint.value.supply, amount)?;

        let credited = RewardAccount { balance, ..account };
        let minted = RewardMint {
            supply,
            ..mint.value
        };
        let batch = WriteBatch::new()
            .put(
                self.mint_address,
                Expectation::Version(mint.version),
                codec::encode(&minted)?,
            )
            .put(credited.address, expectation, codec::encode(&credited)?);
        self.storage.commit(batch)?;

        Ok(CreditReceipt {
            account: credited,
            amount,
            supply,
            opened,
        })
    }
}

//! # Reward Distributor
//!
//! Issues the fixed per-review reward, signing as the configured authority.
//! The owner's account is opened lazily in the same batch as the first
//! credit, so an account never exists without the credit that opened it.

use super::mint_authority::{CreditReceipt, CreditTarget, MintAuthority};
use crate::errors::LedgerResult;
use crate::ports::outbound::LedgerStorage;
use shared_types::Identity;
use std::sync::Arc;

pub struct RewardDistributor<S: LedgerStorage> {
    authority: Arc<MintAuthority<S>>,
    signer: Identity,
    amount: u64,
}

impl<S: LedgerStorage> RewardDistributor<S> {
    pub fn new(authority: Arc<MintAuthority<S>>, signer: Identity, amount: u64) -> Self {
        Self {
            authority,
            signer,
            amount,
        }
    }

    /// Base units credited per reward.
    pub fn amount(&self) -> u64 {
        self.amount
    }

    /// Credit the fixed reward to `owner`.
    pub fn reward(&self, owner: Identity) -> LedgerResult<CreditReceipt> {
        self.authority
            .credit(&self.signer, CreditTarget::Owner(owner), self.amount)
    }
}

//! # Ledger Events
//!
//! Notifications published after a mutation commits.
//!
//! ## Ordering
//!
//! `sequence` is assigned by the dispatcher from a single counter, so the
//! order of events in any sink reflects commit order within one service.
//! `correlation_id` links an event back to the request envelope.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Identity};
use uuid::Uuid;

/// A committed-state notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Strictly increasing per service instance.
    pub sequence: u64,
    /// Request that produced this event.
    pub correlation_id: Uuid,
    /// What happened.
    pub kind: LedgerEventKind,
}

/// Event payloads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEventKind {
    /// The reward mint was created.
    MintInitialized {
        mint: Address,
        authority: Identity,
        decimals: u8,
    },
    /// A review was stored and its reward issued.
    ReviewCreated {
        address: Address,
        owner: Identity,
        title: String,
        rating: u8,
    },
    /// A review's description and rating changed.
    ReviewUpdated {
        address: Address,
        owner: Identity,
        rating: u8,
    },
    /// A review was removed.
    ReviewDeleted {
        address: Address,
        owner: Identity,
        title: String,
    },
    /// A zero-balance reward account was opened for a first-time creator.
    RewardAccountOpened { account: Address, owner: Identity },
    /// Units were credited to a reward account.
    RewardIssued {
        account: Address,
        owner: Identity,
        amount: u64,
        balance: u64,
    },
    /// A create was undone because its reward step failed.
    CreationRolledBack { address: Address, reason: String },
}

impl LedgerEventKind {
    /// Short name used as a log field.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::MintInitialized { .. } => "mint_initialized",
            Self::ReviewCreated { .. } => "review_created",
            Self::ReviewUpdated { .. } => "review_updated",
            Self::ReviewDeleted { .. } => "review_deleted",
            Self::RewardAccountOpened { .. } => "reward_account_opened",
            Self::RewardIssued { .. } => "reward_issued",
            Self::CreationRolledBack { .. } => "creation_rolled_back",
        }
    }
}

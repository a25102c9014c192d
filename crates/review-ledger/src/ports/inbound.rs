//! # Driving Ports (API - Inbound)
//!
//! What callers can ask of the ledger, either as a typed method call
//! (`ReviewLedgerApi`) or as an `Operation` wrapped in an
//! `AuthenticatedRequest` and handed to the dispatcher.

use crate::domain::entities::{MintHandle, Record, RewardAccount, RewardMint};
use crate::domain::invariants::{ReviewDraft, ReviewPatch};
use crate::errors::LedgerResult;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Identity};

// =============================================================================
// OPERATIONS
// =============================================================================

/// Operation payload carried in an `AuthenticatedRequest`.
///
/// The caller identity lives in the envelope, never in the payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Create the singleton reward mint.
    InitializeMint { authority: Identity },
    /// Store a review owned by the caller and reward the caller.
    CreateReview {
        title: String,
        description: String,
        rating: u8,
    },
    /// Fetch one review.
    ReadReview { address: Address },
    /// Change description and rating of a review the caller owns.
    UpdateReview {
        address: Address,
        description: String,
        rating: u8,
    },
    /// Remove a review the caller owns.
    DeleteReview { address: Address },
    /// Snapshot of stored reviews, optionally filtered by owner.
    ListReviews { owner: Option<Identity> },
    /// Fetch an owner's reward account.
    GetRewardAccount { owner: Identity },
}

impl Operation {
    /// Short name used as a span field.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::InitializeMint { .. } => "initialize_mint",
            Self::CreateReview { .. } => "create_review",
            Self::ReadReview { .. } => "read_review",
            Self::UpdateReview { .. } => "update_review",
            Self::DeleteReview { .. } => "delete_review",
            Self::ListReviews { .. } => "list_reviews",
            Self::GetRewardAccount { .. } => "get_reward_account",
        }
    }
}

/// Successful result of a dispatched operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationOutcome {
    Mint(MintHandle),
    Review(Record),
    Deleted { address: Address },
    Reviews(Vec<Record>),
    RewardAccount(RewardAccount),
}

// =============================================================================
// TYPED API
// =============================================================================

/// Primary API for ledger operations.
pub trait ReviewLedgerApi: Send + Sync {
    // === Mint ===

    fn initialize_mint(&self, caller: Identity, authority: Identity) -> LedgerResult<MintHandle>;

    fn mint(&self) -> LedgerResult<RewardMint>;

    // === Reviews ===

    fn create_review(&self, caller: Identity, draft: ReviewDraft) -> LedgerResult<Record>;

    fn read_review(&self, address: Address) -> LedgerResult<Record>;

    fn update_review(
        &self,
        caller: Identity,
        address: Address,
        patch: ReviewPatch,
    ) -> LedgerResult<Record>;

    fn delete_review(&self, caller: Identity, address: Address) -> LedgerResult<()>;

    fn list_reviews(&self, owner: Option<Identity>) -> LedgerResult<Vec<Record>>;

    // === Rewards ===

    fn reward_account(&self, owner: Identity) -> LedgerResult<RewardAccount>;

    /// Balance held by `owner`, zero when no account exists yet.
    fn reward_balance(&self, owner: Identity) -> LedgerResult<u64>;

    // === Addressing ===

    fn review_address(&self, owner: Identity, title: &str) -> LedgerResult<Address>;
}

//! # Domain Entities
//!
//! The three account types held by the ledger and the limits that bound them.
//!
//! ## Type Decisions
//!
//! - `rating: u8` - the permitted range is tiny; a byte matches the stored layout.
//! - `balance`/`supply: u64` - fixed-width unsigned amounts. Overflow is an
//!   explicit error, never a wrap.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Identity};
use uuid::Uuid;

/// Smallest accepted rating.
pub const MIN_RATING: u8 = 1;
/// Largest accepted rating.
pub const MAX_RATING: u8 = 5;
/// Title bound in UTF-8 bytes.
pub const MAX_TITLE_LENGTH: usize = 20;
/// Description bound in UTF-8 bytes.
pub const MAX_DESCRIPTION_LENGTH: usize = 50;

/// Maximum bytes per derivation seed.
pub const MAX_SEED_LEN: usize = 32;
/// Maximum number of seeds per derivation.
pub const MAX_SEEDS: usize = 16;

/// Decimal precision of the reward unit.
pub const REWARD_DECIMALS: u8 = 6;
/// Whole reward units minted per review creation.
pub const REWARD_UNITS_PER_REVIEW: u64 = 10;

// =============================================================================
// RECORD
// =============================================================================

/// A review stored at `derive("review", title, owner)`.
///
/// `owner`, `title` and `incarnation` never change after creation; only
/// `description` and `rating` are mutable, and only by the owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Derived storage key.
    pub address: Address,
    /// Creator identity.
    pub owner: Identity,
    /// Bounded title, part of the address seed.
    pub title: String,
    /// Bounded free text.
    pub description: String,
    /// Integer rating.
    pub rating: u8,
    /// Fresh per create. Tells a re-created record at the same address
    /// apart from the one it replaced.
    pub incarnation: Uuid,
}

// =============================================================================
// REWARD MINT
// =============================================================================

/// Singleton issuer of reward units, stored at `derive("mint")`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardMint {
    /// Derived storage key.
    pub address: Address,
    /// The only identity allowed to mint.
    pub authority: Identity,
    /// Fixed decimal precision.
    pub decimals: u8,
    /// Total units issued so far.
    pub supply: u64,
}

impl RewardMint {
    /// Public view of the mint returned by `initialize`.
    #[must_use]
    pub fn handle(&self) -> MintHandle {
        MintHandle {
            address: self.address,
            authority: self.authority,
            decimals: self.decimals,
        }
    }
}

/// Immutable description of an initialized mint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintHandle {
    pub address: Address,
    pub authority: Identity,
    pub decimals: u8,
}

// =============================================================================
// REWARD ACCOUNT
// =============================================================================

/// Per-owner balance holder, stored at `derive("reward-account", mint, owner)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardAccount {
    /// Derived storage key.
    pub address: Address,
    /// Mint this account belongs to.
    pub mint: Address,
    /// Owner the balance is held for.
    pub owner: Identity,
    /// Units held.
    pub balance: u64,
}

impl RewardAccount {
    /// A zero-balance account, as created lazily by the distributor.
    #[must_use]
    pub fn empty(address: Address, mint: Address, owner: Identity) -> Self {
        Self {
            address,
            mint,
            owner,
            balance: 0,
        }
    }
}

// =============================================================================
// VERSIONED VALUES
// =============================================================================

/// A decoded account together with the storage version it was read at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Versioned<T> {
    pub value: T,
    pub version: u64,
}

// =============================================================================
// LIMITS
// =============================================================================

/// Bounds applied to review payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReviewLimits {
    pub min_rating: u8,
    pub max_rating: u8,
    pub max_title_len: usize,
    pub max_description_len: usize,
}

impl Default for ReviewLimits {
    fn default() -> Self {
        Self {
            min_rating: MIN_RATING,
            max_rating: MAX_RATING,
            max_title_len: MAX_TITLE_LENGTH,
            max_description_len: MAX_DESCRIPTION_LENGTH,
        }
    }
}

/// Bounds applied to address derivation inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DerivationLimits {
    pub max_seed_len: usize,
    pub max_seeds: usize,
}

impl Default for DerivationLimits {
    fn default() -> Self {
        Self {
            max_seed_len: MAX_SEED_LEN,
            max_seeds: MAX_SEEDS,
        }
    }
}

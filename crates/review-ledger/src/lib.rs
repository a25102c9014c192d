//! # Review Ledger - Reviews With On-Ledger Rewards
//!
//! Stores bounded movie reviews at addresses derived from `(title, owner)`
//! and credits the author a fixed amount of reward units for every review
//! created. Record creation and reward issuance form one logical
//! transaction: if the reward cannot be credited, the review is removed
//! again before the error reaches the caller.
//!
//! ## Components
//!
//! | Component | Location | Purpose |
//! |-----------|----------|---------|
//! | Address Deriver | `domain/address.rs` | Keccak-256 storage keys |
//! | Record Store | `service/record_store.rs` | Review CRUD with owner checks |
//! | Mint Authority | `service/mint_authority.rs` | Singleton mint, balance credits |
//! | Reward Distributor | `service/reward_distributor.rs` | Fixed reward per create |
//! | Dispatcher | `service/mod.rs` | Request lifecycle, locking, compensation |
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Rating in `[1, 5]`, title ≤ 20 bytes, description ≤ 50 bytes | `domain/invariants.rs` |
//! | Record address = `derive("review", title, owner)` | `service/record_store.rs` - `read_versioned()` |
//! | Only the owner updates or deletes | `service/record_store.rs` |
//! | Only the mint authority credits balances | `service/mint_authority.rs` |
//! | Mint authority matches the configured signer | `service/mod.rs` - `initialize_mint_in()` |
//! | Balance and supply never wrap | `domain/invariants.rs` - `checked_credit()` |
//! | No record without its reward | `service/mod.rs` - `compensate()` |
//!
//! ## Outbound Dependencies
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | `LedgerStorage` | Versioned get / guarded batch commit / scan |
//! | `EventSink` | Ordered notifications of committed state |
//!
//! ## Usage Example
//!
//! ```ignore
//! use review_ledger::prelude::*;
//!
//! let ledger = ReviewLedgerService::new(
//!     LedgerConfig::default(),
//!     Arc::new(InMemoryStorage::new()),
//!     Arc::new(TracingEventSink),
//! )?;
//! ledger.initialize_mint(payer, default_mint_authority())?;
//!
//! let review = ledger.create_review(alice, ReviewDraft::new("Just a test movie", "Wow", 5))?;
//! assert_eq!(ledger.reward_balance(alice)?, 10_000_000);
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::adapters::{InMemoryEventLog, InMemoryStorage, NoopEventSink, TracingEventSink};
    pub use crate::config::{ConcurrencyConfig, ConfigError, LedgerConfig, RewardConfig};
    pub use crate::domain::address::{default_mint_authority, AddressDeriver};
    pub use crate::domain::entities::{
        MintHandle, Record, RewardAccount, RewardMint, Versioned, MAX_DESCRIPTION_LENGTH,
        MAX_RATING, MAX_TITLE_LENGTH, MIN_RATING,
    };
    pub use crate::domain::invariants::{ReviewDraft, ReviewPatch};
    pub use crate::errors::{LedgerError, LedgerResult, StorageError};
    pub use crate::events::{LedgerEvent, LedgerEventKind};
    pub use crate::ports::inbound::{Operation, OperationOutcome, ReviewLedgerApi};
    pub use crate::ports::outbound::{EventSink, LedgerStorage};
    pub use crate::service::{ReviewLedgerService, ServiceStats};
    pub use shared_types::{Address, AuthenticatedRequest, ErrorKind, Identity};
    pub use std::sync::Arc;
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

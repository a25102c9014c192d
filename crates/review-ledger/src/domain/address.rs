//! # Address Derivation
//!
//! Pure, deterministic storage keys computed from identifying fields.
//!
//! Address = keccak256(DOMAIN_TAG ++ len8(ns) ++ ns ++ count8(parts) ++ [len16(p) ++ p]*)
//!
//! Every variable-length field is length-prefixed, so two different
//! `(namespace, parts)` tuples never share a preimage. Distinct outputs then
//! only fail by hash collision.
//!
//! ## Architecture Compliance
//!
//! - NO I/O operations
//! - NO side effects
//! - Pure functions only

use crate::domain::entities::DerivationLimits;
use crate::errors::{LedgerError, LedgerResult};
use sha3::{Digest, Keccak256};
use shared_types::{Address, Identity};

/// Domain separation tag prefixed to every preimage.
pub const DOMAIN_TAG: &[u8] = b"review-ledger/derive/v1";

/// Namespace for review records.
pub const REVIEW_NAMESPACE: &str = "review";
/// Namespace for the singleton reward mint.
pub const MINT_NAMESPACE: &str = "mint";
/// Namespace for per-owner reward accounts.
pub const REWARD_ACCOUNT_NAMESPACE: &str = "reward-account";
/// Namespace for the program-derived mint authority.
pub const MINT_AUTHORITY_NAMESPACE: &str = "mint-authority";

// =============================================================================
// DERIVER
// =============================================================================

/// Derives addresses under a fixed set of input limits.
#[derive(Clone, Copy, Debug, Default)]
pub struct AddressDeriver {
    limits: DerivationLimits,
}

impl AddressDeriver {
    /// Create a deriver with explicit limits.
    #[must_use]
    pub fn new(limits: DerivationLimits) -> Self {
        Self { limits }
    }

    /// Derive the address for `namespace` and `parts`.
    ///
    /// # Errors
    ///
    /// `InvalidNamespace` for an empty or oversized namespace, `TooManySeeds`
    /// or `SeedTooLong` when parts exceed the configured limits.
    pub fn derive(&self, namespace: &str, parts: &[&[u8]]) -> LedgerResult<Address> {
        if namespace.is_empty() {
            return Err(LedgerError::InvalidNamespace("empty".into()));
        }
        if namespace.len() > self.limits.max_seed_len {
            return Err(LedgerError::InvalidNamespace(format!(
                "{} bytes > {}",
                namespace.len(),
                self.limits.max_seed_len
            )));
        }
        if parts.len() > self.limits.max_seeds {
            return Err(LedgerError::TooManySeeds {
                count: parts.len(),
                max: self.limits.max_seeds,
            });
        }
        for (index, part) in parts.iter().enumerate() {
            if part.len() > self.limits.max_seed_len {
                return Err(LedgerError::SeedTooLong {
                    index,
                    len: part.len(),
                    max: self.limits.max_seed_len,
                });
            }
        }

        let mut hasher = Keccak256::new();
        hasher.update(DOMAIN_TAG);
        // Lengths fit: both bounded by the limits checked above, which
        // `validate()` keeps within u8/u16.
        hasher.update([namespace.len() as u8]);
        hasher.update(namespace.as_bytes());
        hasher.update([parts.len() as u8]);
        for part in parts {
            hasher.update((part.len() as u16).to_be_bytes());
            hasher.update(part);
        }
        let digest: [u8; 32] = hasher.finalize().into();
        Ok(Address::new(digest))
    }

    /// `derive("review", title, owner)`.
    pub fn review_address(&self, owner: &Identity, title: &str) -> LedgerResult<Address> {
        self.derive(REVIEW_NAMESPACE, &[title.as_bytes(), owner.as_bytes()])
    }

    /// `derive("mint")`.
    pub fn mint_address(&self) -> LedgerResult<Address> {
        self.derive(MINT_NAMESPACE, &[])
    }

    /// `derive("reward-account", mint, owner)`.
    pub fn reward_account_address(&self, mint: &Address, owner: &Identity) -> LedgerResult<Address> {
        self.derive(
            REWARD_ACCOUNT_NAMESPACE,
            &[mint.as_bytes(), owner.as_bytes()],
        )
    }

    /// `derive("mint-authority")` as an identity.
    pub fn default_mint_authority(&self) -> LedgerResult<Identity> {
        self.derive(MINT_AUTHORITY_NAMESPACE, &[]).map(Identity::from)
    }
}

/// Program-derived authority under default limits.
///
/// Cannot fail: the namespace is a short constant with no parts.
#[must_use]
pub fn default_mint_authority() -> Identity {
    let mut hasher = Keccak256::new();
    hasher.update(DOMAIN_TAG);
    hasher.update([MINT_AUTHORITY_NAMESPACE.len() as u8]);
    hasher.update(MINT_AUTHORITY_NAMESPACE.as_bytes());
    hasher.update([0u8]);
    let digest: [u8; 32] = hasher.finalize().into();
    Identity::new(digest)
}

// =============================================================================
// TESTS
// =============================================================================

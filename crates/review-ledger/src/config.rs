//! Ledger configuration with validation.
//!
//! Defaults: ratings 1..=5, 20-byte titles, 50-byte descriptions, 10 whole
//! reward units at 6 decimals.

use crate::domain::address::default_mint_authority;
use crate::domain::entities::{
    DerivationLimits, ReviewLimits, REWARD_DECIMALS, REWARD_UNITS_PER_REVIEW,
};
use shared_types::Identity;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Smallest `max_seed_len` that still fits an identity seed.
const MIN_SEED_LEN: usize = 32;
/// Smallest `max_seeds` that still fits the two-part namespaces.
const MIN_SEEDS: usize = 2;

/// Top-level ledger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LedgerConfig {
    /// Review payload bounds.
    pub limits: ReviewLimits,
    /// Address derivation bounds.
    pub derivation: DerivationLimits,
    /// Reward issuance parameters.
    pub reward: RewardConfig,
    /// Locking and retry parameters.
    pub concurrency: ConcurrencyConfig,
}

/// Reward issuance parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardConfig {
    /// Identity the distributor signs mint operations with.
    pub authority: Identity,
    /// Decimal precision of a new mint.
    pub decimals: u8,
    /// Whole units credited per review creation.
    pub units_per_review: u64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            authority: default_mint_authority(),
            decimals: REWARD_DECIMALS,
            units_per_review: REWARD_UNITS_PER_REVIEW,
        }
    }
}

impl RewardConfig {
    /// Base units credited per creation: `units_per_review * 10^decimals`.
    pub fn amount(&self) -> Result<u64, ConfigError> {
        10u64
            .checked_pow(u32::from(self.decimals))
            .and_then(|scale| self.units_per_review.checked_mul(scale))
            .ok_or(ConfigError::RewardOverflow {
                units: self.units_per_review,
                decimals: self.decimals,
            })
    }
}

/// Locking and retry parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcurrencyConfig {
    /// Number of address lock stripes.
    pub lock_stripes: usize,
    /// Upper bound on waiting for any lock.
    pub lock_timeout_ms: u64,
    /// Optimistic commit attempts before reporting `Conflict`.
    pub max_commit_retries: u32,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            lock_stripes: 64,
            lock_timeout_ms: 250,
            max_commit_retries: 8,
        }
    }
}

impl ConcurrencyConfig {
    #[must_use]
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("min_rating {min} exceeds max_rating {max}")]
    InvalidRatingRange { min: u8, max: u8 },

    #[error("reward amount overflows u64: {units} units at {decimals} decimals")]
    RewardOverflow { units: u64, decimals: u8 },

    #[error("invalid derivation limit: {0}")]
    InvalidDerivationLimit(String),

    #[error("invalid concurrency setting: {0}")]
    InvalidConcurrency(String),
}

impl LedgerConfig {
    /// Load overrides from `RL_*` environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `RL_MAX_TITLE_LEN`: title bound in bytes (default: 20)
    /// - `RL_MAX_DESCRIPTION_LEN`: description bound in bytes (default: 50)
    /// - `RL_REWARD_DECIMALS`: mint precision (default: 6)
    /// - `RL_REWARD_UNITS`: whole units per review (default: 10)
    /// - `RL_MINT_AUTHORITY`: hex identity the distributor signs with
    /// - `RL_LOCK_STRIPES`: address lock stripes (default: 64)
    /// - `RL_LOCK_TIMEOUT_MS`: lock wait bound (default: 250)
    /// - `RL_MAX_COMMIT_RETRIES`: optimistic retries (default: 8)
    ///
    /// Unparseable values keep the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse().ok());
        let mut config = Self::default();

        if let Some(v) = parsed("RL_MAX_TITLE_LEN") {
            config.limits.max_title_len = v;
        }
        if let Some(v) = parsed("RL_MAX_DESCRIPTION_LEN") {
            config.limits.max_description_len = v;
        }
        if let Some(v) = lookup("RL_REWARD_DECIMALS").and_then(|v| v.trim().parse().ok()) {
            config.reward.decimals = v;
        }
        if let Some(v) = lookup("RL_REWARD_UNITS").and_then(|v| v.trim().parse().ok()) {
            config.reward.units_per_review = v;
        }
        if let Some(v) = lookup("RL_MINT_AUTHORITY").and_then(|v| Identity::from_hex(v.trim()).ok())
        {
            config.reward.authority = v;
        }
        if let Some(v) = parsed("RL_LOCK_STRIPES") {
            config.concurrency.lock_stripes = v;
        }
        if let Some(v) = lookup("RL_LOCK_TIMEOUT_MS").and_then(|v| v.trim().parse().ok()) {
            config.concurrency.lock_timeout_ms = v;
        }
        if let Some(v) = lookup("RL_MAX_COMMIT_RETRIES").and_then(|v| v.trim().parse().ok()) {
            config.concurrency.max_commit_retries = v;
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.min_rating > self.limits.max_rating {
            return Err(ConfigError::InvalidRatingRange {
                min: self.limits.min_rating,
                max: self.limits.max_rating,
            });
        }

        self.reward.amount()?;

        // Review and reward-account seeds carry 32-byte identities in two
        // parts. Lengths are encoded as u8 (namespace) and u16 (parts), the
        // seed count as u8.
        if !(MIN_SEED_LEN..=255).contains(&self.derivation.max_seed_len) {
            return Err(ConfigError::InvalidDerivationLimit(format!(
                "max_seed_len must be in {MIN_SEED_LEN}..=255, got {}",
                self.derivation.max_seed_len
            )));
        }
        if !(MIN_SEEDS..=255).contains(&self.derivation.max_seeds) {
            return Err(ConfigError::InvalidDerivationLimit(format!(
                "max_seeds must be in {MIN_SEEDS}..=255, got {}",
                self.derivation.max_seeds
            )));
        }

        // The title is a derivation seed.
        if self.limits.max_title_len > self.derivation.max_seed_len {
            return Err(ConfigError::InvalidDerivationLimit(format!(
                "max_title_len {} exceeds max_seed_len {}",
                self.limits.max_title_len, self.derivation.max_seed_len
            )));
        }

        if self.concurrency.lock_stripes == 0 {
            return Err(ConfigError::InvalidConcurrency(
                "lock_stripes cannot be 0".into(),
            ));
        }
        if self.concurrency.max_commit_retries == 0 {
            return Err(ConfigError::InvalidConcurrency(
                "max_commit_retries cannot be 0".into(),
            ));
        }

        Ok(())
    }
}

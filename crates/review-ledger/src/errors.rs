//! # Error Types
//!
//! All error types for the review ledger.

use shared_types::{Address, ErrorKind, Identity, MessageError};
use thiserror::Error;

// =============================================================================
// LEDGER ERRORS
// =============================================================================

/// Errors surfaced to callers of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Rating outside the permitted range.
    #[error("rating must be between {min} and {max}, got {rating}")]
    InvalidRating { rating: u8, min: u8, max: u8 },

    /// Title longer than the configured bound (bytes).
    #[error("title too long: {len} > {max} bytes")]
    TitleTooLong { len: usize, max: usize },

    /// Description longer than the configured bound (bytes).
    #[error("description too long: {len} > {max} bytes")]
    DescriptionTooLong { len: usize, max: usize },

    /// A derivation seed exceeds the maximum seed length.
    #[error("seed {index} too long: {len} > {max} bytes")]
    SeedTooLong { index: usize, len: usize, max: usize },

    /// Too many derivation seeds.
    #[error("too many seeds: {count} > {max}")]
    TooManySeeds { count: usize, max: usize },

    /// Namespace missing or oversized.
    #[error("invalid namespace: {0}")]
    InvalidNamespace(String),

    /// Envelope produced by an incompatible protocol revision.
    #[error(transparent)]
    Envelope(#[from] MessageError),

    /// Address holds an account of a different type.
    #[error("account at {address} is not a {expected}")]
    AccountTypeMismatch {
        address: Address,
        expected: &'static str,
    },

    /// No account at the address.
    #[error("{what} not found at {address}")]
    NotFound {
        address: Address,
        what: &'static str,
    },

    /// Address already occupied.
    #[error("account already exists at {address}")]
    AlreadyExists { address: Address },

    /// Caller does not hold the required identity.
    #[error("unauthorized: caller {caller} is not {expected}")]
    Unauthorized { caller: Identity, expected: Identity },

    /// Mint initialization named an authority the distributor cannot sign as.
    #[error("mint authority {authority} does not match configured {expected}")]
    AuthorityMismatch {
        authority: Identity,
        expected: Identity,
    },

    /// Concurrent write won the race, or a lock could not be taken in time.
    #[error("conflict at {address}: {reason}")]
    Conflict { address: Address, reason: String },

    /// Balance or supply would exceed `u64::MAX`.
    #[error("{what} overflow: {current} + {amount} exceeds u64::MAX")]
    Overflow {
        what: &'static str,
        current: u64,
        amount: u64,
    },

    /// Stored bytes could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(String),

    /// Stored record does not sit at the address derived from its fields.
    #[error("record at {address} does not match its derived address")]
    AddressMismatch { address: Address },

    /// Storage backend failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Undoing a partially applied create failed.
    #[error("compensation failed after {original}: {cause}")]
    CompensationFailed {
        original: Box<LedgerError>,
        cause: Box<LedgerError>,
    },
}

impl LedgerError {
    /// Classify into a caller-facing kind.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRating { .. }
            | Self::TitleTooLong { .. }
            | Self::DescriptionTooLong { .. }
            | Self::SeedTooLong { .. }
            | Self::TooManySeeds { .. }
            | Self::InvalidNamespace(_)
            | Self::Envelope(_)
            | Self::AccountTypeMismatch { .. } => ErrorKind::InvalidInput,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::Unauthorized { .. } | Self::AuthorityMismatch { .. } => ErrorKind::Unauthorized,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Overflow { .. } => ErrorKind::Overflow,
            Self::Codec(_) | Self::Storage(_) | Self::AddressMismatch { .. } => {
                ErrorKind::Internal
            }
            Self::CompensationFailed { original, .. } => original.kind(),
        }
    }

    /// Returns true if the caller may retry the same request.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}

// =============================================================================
// STORAGE ERRORS
// =============================================================================

/// Errors from the storage backend port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// A batch expectation did not hold.
    #[error("version mismatch at {address}: expected {expected}, found {actual:?}")]
    VersionMismatch {
        address: Address,
        expected: String,
        actual: Option<u64>,
    },

    /// The backend could not be locked within the latency bound.
    #[error("storage lock timeout after {waited_ms}ms")]
    Timeout { waited_ms: u64 },

    /// Backend unreachable or failed.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<StorageError> for LedgerError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::VersionMismatch { address, .. } => Self::Conflict {
                address,
                reason: err.to_string(),
            },
            StorageError::Timeout { .. } => Self::Conflict {
                address: Address::ZERO,
                reason: err.to_string(),
            },
            StorageError::Unavailable(msg) => Self::Storage(msg),
        }
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

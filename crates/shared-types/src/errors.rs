//! # Error Types
//!
//! Error classification shared across crates.

use std::fmt;
use thiserror::Error;

/// Caller-facing failure classes.
///
/// Every error surfaced by the ledger maps to exactly one kind. The kind
/// decides whether the caller may retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or out-of-bounds payload. Fix and resubmit.
    InvalidInput,
    /// Address absent.
    NotFound,
    /// Address occupied on create.
    AlreadyExists,
    /// Caller is not the owner or the mint authority.
    Unauthorized,
    /// Lost a concurrent-write race. Safe to retry after backoff.
    Conflict,
    /// Balance or supply limit reached. Needs operator intervention.
    Overflow,
    /// Backend or codec fault outside the caller's control.
    Internal,
}

impl ErrorKind {
    /// Only `Conflict` is safe to retry unchanged.
    #[must_use]
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Conflict)
    }

    /// Stable lowercase name, used as a log field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::NotFound => "not_found",
            Self::AlreadyExists => "already_exists",
            Self::Unauthorized => "unauthorized",
            Self::Conflict => "conflict",
            Self::Overflow => "overflow",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors related to envelope verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// Envelope version not supported.
    #[error("Unsupported version: received {received}, supported {supported}")]
    UnsupportedVersion { received: u16, supported: u16 },
}

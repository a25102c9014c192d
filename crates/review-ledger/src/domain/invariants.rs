//! # Domain Invariants
//!
//! Checks that MUST hold before any state change is attempted.
//!
//! - Rating lies in `[min_rating, max_rating]`
//! - Title and description respect their byte bounds
//! - A record's address equals `derive("review", title, owner)`
//! - Owner and title never change across an update
//! - Balances and supply only grow by checked addition

use crate::domain::address::AddressDeriver;
use crate::domain::entities::{Record, ReviewLimits};
use crate::errors::{LedgerError, LedgerResult};

// =============================================================================
// PAYLOAD VALIDATION
// =============================================================================

/// Fields supplied when creating a review.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewDraft {
    pub title: String,
    pub description: String,
    pub rating: u8,
}

impl ReviewDraft {
    /// Build a draft from raw fields.
    pub fn new(title: impl Into<String>, description: impl Into<String>, rating: u8) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            rating,
        }
    }

    /// Check every bound. Rating first, then title, then description.
    pub fn validate(&self, limits: &ReviewLimits) -> LedgerResult<()> {
        check_rating(self.rating, limits)?;
        check_title(&self.title, limits)?;
        check_description(&self.description, limits)
    }
}

/// Mutable fields supplied when updating a review.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewPatch {
    pub description: String,
    pub rating: u8,
}

impl ReviewPatch {
    pub fn new(description: impl Into<String>, rating: u8) -> Self {
        Self {
            description: description.into(),
            rating,
        }
    }

    pub fn validate(&self, limits: &ReviewLimits) -> LedgerResult<()> {
        check_rating(self.rating, limits)?;
        check_description(&self.description, limits)
    }

    /// Apply onto `record`, leaving address, owner and title untouched.
    pub fn apply_to(&self, record: &mut Record) {
        record.description.clone_from(&self.description);
        record.rating = self.rating;
    }
}

pub fn check_rating(rating: u8, limits: &ReviewLimits) -> LedgerResult<()> {
    if rating < limits.min_rating || rating > limits.max_rating {
        return Err(LedgerError::InvalidRating {
            rating,
            min: limits.min_rating,
            max: limits.max_rating,
        });
    }
    Ok(())
}

pub fn check_title(title: &str, limits: &ReviewLimits) -> LedgerResult<()> {
    if title.len() > limits.max_title_len {
        return Err(LedgerError::TitleTooLong {
            len: title.len(),
            max: limits.max_title_len,
        });
    }
    Ok(())
}

pub fn check_description(description: &str, limits: &ReviewLimits) -> LedgerResult<()> {
    if description.len() > limits.max_description_len {
        return Err(LedgerError::DescriptionTooLong {
            len: description.len(),
            max: limits.max_description_len,
        });
    }
    Ok(())
}

// =============================================================================
// STATE INVARIANTS
// =============================================================================

/// A stored record sits at the address derived from its own fields.
#[must_use]
pub fn check_address_invariant(record: &Record, deriver: &AddressDeriver) -> bool {
    deriver
        .review_address(&record.owner, &record.title)
        .map(|derived| derived == record.address)
        .unwrap_or(false)
}

/// An update never rewrites identifying fields.
#[must_use]
pub fn check_identity_preserved(before: &Record, after: &Record) -> bool {
    before.address == after.address
        && before.owner == after.owner
        && before.title == after.title
        && before.incarnation == after.incarnation
}

/// Checked addition for balances and supply.
pub fn checked_credit(what: &'static str, current: u64, amount: u64) -> LedgerResult<u64> {
    current.checked_add(amount).ok_or(LedgerError::Overflow {
        what,
        current,
        amount,
    })
}

//! # Shared Types Crate
//!
//! Identifiers, the request envelope and the error classification used by
//! every crate in the review ledger workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate types are defined here.
//! - **Envelope Integrity**: `AuthenticatedRequest<T>` is the sole wrapper for
//!   operations entering the ledger.
//! - **No Redundant Identity**: Payloads MUST NOT contain caller fields;
//!   the envelope's `caller` is authoritative.

pub mod entities;
pub mod envelope;
pub mod errors;

pub use entities::*;
pub use envelope::AuthenticatedRequest;
pub use errors::*;

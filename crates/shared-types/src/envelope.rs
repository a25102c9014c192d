//! # `AuthenticatedRequest` Envelope
//!
//! The wrapper for every operation submitted to the ledger.
//!
//! ## Properties
//!
//! - **Versioning**: All requests carry a `version` for forward compatibility.
//! - **Correlation**: `correlation_id` ties log lines and emitted events to the request.
//! - **Envelope Authority**: `caller` is the sole source of truth for identity.
//!   Payloads MUST NOT carry a second, competing identity field.

use crate::entities::Identity;
use crate::errors::MessageError;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Request envelope produced by the authentication collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedRequest<T> {
    /// Protocol version. Checked before the payload is looked at.
    pub version: u16,

    /// Verified identity of the caller.
    pub caller: Identity,

    /// Unique identifier for log and event correlation.
    pub correlation_id: Uuid,

    /// Unix timestamp (seconds) when the request was created.
    pub timestamp: u64,

    /// The operation payload.
    pub payload: T,
}

impl<T> AuthenticatedRequest<T> {
    /// Current protocol version.
    pub const CURRENT_VERSION: u16 = 1;

    /// Wrap a payload for `caller` with a fresh correlation id.
    pub fn new(caller: Identity, payload: T) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            caller,
            correlation_id: Uuid::new_v4(),
            timestamp: now_secs(),
            payload,
        }
    }

    /// Override the correlation id (request/response pairing by the caller).
    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = correlation_id;
        self
    }

    /// Reject envelopes produced by an incompatible protocol revision.
    pub fn check_version(&self) -> Result<(), MessageError> {
        if self.version == Self::CURRENT_VERSION {
            Ok(())
        } else {
            Err(MessageError::UnsupportedVersion {
                received: self.version,
                supported: Self::CURRENT_VERSION,
            })
        }
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

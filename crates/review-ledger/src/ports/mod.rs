//! # Ports Layer
//!
//! - `inbound`: what callers drive (operations, typed API)
//! - `outbound`: what the ledger drives (storage, event sink)

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;

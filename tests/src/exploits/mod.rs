//! Attack simulations against the ledger's authorization and atomicity
//! guarantees.

pub mod ownership;
pub mod reward_rollback;
pub mod squatting;

//! Integration tests across the record store, mint authority, reward
//! distributor and dispatcher.

pub mod concurrency;

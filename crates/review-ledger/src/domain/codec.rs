//! # Account Codec
//!
//! Stored layout: `discriminator (8 bytes) ++ bincode(payload)`.
//!
//! The discriminator is `keccak256("account:" ++ TYPE_NAME)[..8]`. It lets a
//! reader reject bytes written for a different account type instead of
//! misinterpreting them.

use crate::domain::entities::{Record, RewardAccount, RewardMint};
use crate::errors::{LedgerError, LedgerResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha3::{Digest, Keccak256};
use shared_types::Address;

/// Discriminator length in bytes.
pub const DISCRIMINATOR_LEN: usize = 8;

/// An account type with a stable on-storage tag.
pub trait AccountData: Serialize + DeserializeOwned {
    /// Type name hashed into the discriminator.
    const TYPE_NAME: &'static str;

    /// The 8-byte tag prefixed to encoded values.
    fn discriminator() -> [u8; DISCRIMINATOR_LEN] {
        discriminator_for(Self::TYPE_NAME)
    }
}

impl AccountData for Record {
    const TYPE_NAME: &'static str = "Record";
}

impl AccountData for RewardMint {
    const TYPE_NAME: &'static str = "RewardMint";
}

impl AccountData for RewardAccount {
    const TYPE_NAME: &'static str = "RewardAccount";
}

/// `keccak256("account:" ++ name)[..8]`.
#[must_use]
pub fn discriminator_for(type_name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let mut hasher = Keccak256::new();
    hasher.update(b"account:");
    hasher.update(type_name.as_bytes());
    let digest = hasher.finalize();
    let mut out = [0u8; DISCRIMINATOR_LEN];
    out.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
    out
}

/// Encode an account with its discriminator.
pub fn encode<T: AccountData>(value: &T) -> LedgerResult<Vec<u8>> {
    let body = bincode::serialize(value).map_err(|e| LedgerError::Codec(e.to_string()))?;
    let mut out = Vec::with_capacity(DISCRIMINATOR_LEN + body.len());
    out.extend_from_slice(&T::discriminator());
    out.extend_from_slice(&body);
    Ok(out)
}

/// Returns true if `data` carries `T`'s discriminator.
#[must_use]
pub fn is_type<T: AccountData>(data: &[u8]) -> bool {
    data.len() >= DISCRIMINATOR_LEN && data[..DISCRIMINATOR_LEN] == T::discriminator()
}

/// Decode an account stored at `address`.
///
/// # Errors
///
/// `AccountTypeMismatch` if the bytes belong to another account type,
/// `Codec` if they are truncated or malformed.
pub fn decode<T: AccountData>(address: &Address, data: &[u8]) -> LedgerResult<T> {
    if data.len() < DISCRIMINATOR_LEN {
        return Err(LedgerError::Codec(format!(
            "account at {address} truncated: {} bytes",
            data.len()
        )));
    }
    if !is_type::<T>(data) {
        return Err(LedgerError::AccountTypeMismatch {
            address: *address,
            expected: T::TYPE_NAME,
        });
    }
    bincode::deserialize(&data[DISCRIMINATOR_LEN..]).map_err(|e| LedgerError::Codec(e.to_string()))
}

pub mod address;
pub mod codec;
pub mod entities;
pub mod invariants;

pub use address::*;
pub use codec::{AccountData, DISCRIMINATOR_LEN};
pub use entities::*;
pub use invariants::*;

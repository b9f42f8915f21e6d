//! `EntryPoint` contract definitions and user-operation hashing for the
//! supported ERC-4337 versions.

pub mod v06;
pub use v06::hash_user_operation as hash_user_operation_v06;

pub mod v07;
pub use v07::hash_user_operation as hash_user_operation_v07;

pub mod version;
pub use version::{EntryPointVersion, UnknownEntryPointAddress};

use alloy_primitives::{Address, B256, ChainId};

use crate::UserOperation;

/// Computes the hash of a user operation against the given entry point,
/// dispatching on the entry point's detected version.
pub fn hash_user_operation(
    user_operation: &UserOperation,
    entry_point: Address,
    chain_id: ChainId,
) -> Result<B256, UnknownEntryPointAddress> {
    match EntryPointVersion::try_from(entry_point)? {
        EntryPointVersion::V06 => Ok(hash_user_operation_v06(user_operation, entry_point, chain_id)),
        EntryPointVersion::V07 => Ok(hash_user_operation_v07(user_operation, entry_point, chain_id)),
    }
}

/*
 * ERC-4337 v0.7 UserOperation Hash Calculation
 *
 * v0.7 packs the two gas-limit pairs into single 32-byte words before
 * hashing:
 *
 *   accountGasLimits = verificationGasLimit(16) ++ callGasLimit(16)
 *   gasFees          = maxPriorityFeePerGas(16) ++ maxFeePerGas(16)
 *
 * 1. Hash variable-length fields: initCode, callData, paymasterAndData
 * 2. Pack all fields into struct (hashes from step 1, packed gas words)
 * 3. encodedHash = keccak256(abi.encode(packed struct))
 * 4. final hash = keccak256(abi.encode(encodedHash, entryPoint, chainId))
 */
use alloy_primitives::{B256, ChainId, U256};
use alloy_sol_types::{SolValue, sol};

use crate::UserOperation;

sol! {
    #[allow(missing_docs)]
    #[derive(Default, Debug, PartialEq, Eq)]
    struct UserOperationHashEncoded {
        bytes32 encodedHash;
        address entryPoint;
        uint256 chainId;
    }

    #[allow(missing_docs)]
    #[derive(Default, Debug, PartialEq, Eq)]
    struct UserOperationPackedForHash {
        address sender;
        uint256 nonce;
        bytes32 hashInitCode;
        bytes32 hashCallData;
        bytes32 accountGasLimits;
        uint256 preVerificationGas;
        bytes32 gasFees;
        bytes32 hashPaymasterAndData;
    }
}

impl From<&UserOperation> for UserOperationPackedForHash {
    fn from(op: &UserOperation) -> Self {
        Self {
            sender: op.sender,
            nonce: op.nonce,
            hashInitCode: alloy_primitives::keccak256(op.init_code()),
            hashCallData: alloy_primitives::keccak256(&op.call_data),
            accountGasLimits: pack_pair(op.verification_gas_limit, op.call_gas_limit),
            preVerificationGas: op.pre_verification_gas,
            gasFees: pack_pair(op.max_priority_fee_per_gas, op.max_fee_per_gas),
            hashPaymasterAndData: alloy_primitives::keccak256(op.paymaster_and_data()),
        }
    }
}

// Two 128-bit values packed big-endian into one word, high half first.
fn pack_pair(high: U256, low: U256) -> B256 {
    let mut out = [0u8; 32];
    out[..16].copy_from_slice(&high.saturating_to::<u128>().to_be_bytes());
    out[16..].copy_from_slice(&low.saturating_to::<u128>().to_be_bytes());
    B256::from(out)
}

/// Computes the hash of a user operation against a v0.7 entry point, as
/// defined by ERC-4337.
pub fn hash_user_operation(
    user_operation: &UserOperation,
    entry_point: alloy_primitives::Address,
    chain_id: ChainId,
) -> alloy_primitives::B256 {
    let packed = UserOperationPackedForHash::from(user_operation);
    let encoded = UserOperationHashEncoded {
        encodedHash: alloy_primitives::keccak256(packed.abi_encode()),
        entryPoint: entry_point,
        chainId: U256::from(chain_id),
    };
    alloy_primitives::keccak256(encoded.abi_encode())
}

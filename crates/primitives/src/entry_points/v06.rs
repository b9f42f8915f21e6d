/*
 * ERC-4337 v0.6 UserOperation Hash Calculation
 *
 * 1. Hash variable-length fields: initCode, callData, paymasterAndData
 * 2. Pack all fields into struct (using hashes from step 1, gas values as uint256)
 * 3. encodedHash = keccak256(abi.encode(packed struct))
 * 4. final hash = keccak256(abi.encode(encodedHash, entryPoint, chainId))
 */
use alloy_primitives::{Bytes, ChainId, U256};
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
        uint256 callGasLimit;
        uint256 verificationGasLimit;
        uint256 preVerificationGas;
        uint256 maxFeePerGas;
        uint256 maxPriorityFeePerGas;
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
            callGasLimit: op.call_gas_limit,
            verificationGasLimit: op.verification_gas_limit,
            preVerificationGas: op.pre_verification_gas,
            maxFeePerGas: op.max_fee_per_gas,
            maxPriorityFeePerGas: op.max_priority_fee_per_gas,
            hashPaymasterAndData: alloy_primitives::keccak256(paymaster_and_data(op)),
        }
    }
}

// The v0.6 wire layout carries no paymaster gas limits: just the paymaster
// address followed by its data.
fn paymaster_and_data(op: &UserOperation) -> Bytes {
    let Some(paymaster) = op.paymaster else {
        return Bytes::new();
    };
    let data = op.paymaster_data.clone().unwrap_or_default();
    let mut out = Vec::with_capacity(20 + data.len());
    out.extend_from_slice(paymaster.as_slice());
    out.extend_from_slice(&data);
    out.into()
}

/// Computes the hash of a user operation against a v0.6 entry point, as
/// defined by ERC-4337.
///
/// The hash is computed by packing the operation fields, hashing the packed
/// data, and then encoding with the entry point address and chain ID.
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

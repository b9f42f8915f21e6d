//! Decoding shapes for ERC-7579 modular accounts.
//!
//! ERC-7579 funnels every execution through
//! `execute(bytes32 mode, bytes executionCalldata)`. The first byte of the
//! mode word selects the call type: `0x00` single packed call, `0x01`
//! ABI-encoded batch, `0xff` delegate call. Delegate calls and unrecognized
//! call types are rejected before any call is produced.

use alloy_primitives::{Address, U256};
use alloy_sol_types::{SolCall, SolValue};
use opguard_primitives::LowLevelCall;

use crate::DecodeError;

pub(crate) mod sol_defs {
    use alloy_sol_types::sol;

    sol! {
        /// One entry of an ERC-7579 batch execution.
        #[derive(Debug, PartialEq, Eq)]
        struct Execution {
            address target;
            uint256 value;
            bytes callData;
        }

        /// `IERC7579Account.execute(bytes32 mode, bytes executionCalldata)`
        function execute(bytes32 mode, bytes executionCalldata);
    }
}

const STANDARD: &str = "erc-7579";

/// Call-type byte for a single packed call.
const CALLTYPE_SINGLE: u8 = 0x00;
/// Call-type byte for an ABI-encoded batch.
const CALLTYPE_BATCH: u8 = 0x01;
/// Call-type byte for a delegate call. Always rejected.
const CALLTYPE_DELEGATECALL: u8 = 0xff;

/// A packed single call is `target(20) ++ value(32) ++ data`.
const PACKED_SINGLE_HEADER: usize = 52;

/// Attempts the ERC-7579 shapes against the call data.
///
/// The mode word is authoritative: a batch mode with a malformed batch
/// payload is a hard error, never a fallback to the single-call shape.
pub fn decode(call_data: &[u8]) -> Result<Option<Vec<LowLevelCall>>, DecodeError> {
    if !call_data.starts_with(&sol_defs::executeCall::SELECTOR) {
        return Ok(None);
    }

    let call = sol_defs::executeCall::abi_decode(call_data).map_err(|e| {
        DecodeError::MalformedPayload { standard: STANDARD, message: e.to_string() }
    })?;

    match call.mode[0] {
        CALLTYPE_BATCH => decode_batch(&call.executionCalldata).map(Some),
        CALLTYPE_SINGLE => decode_single(&call.executionCalldata).map(Some),
        CALLTYPE_DELEGATECALL => Err(DecodeError::DelegateCallBlocked),
        other => Err(DecodeError::UnknownExecutionMode { call_type: other }),
    }
}

fn decode_batch(execution_calldata: &[u8]) -> Result<Vec<LowLevelCall>, DecodeError> {
    let executions = <Vec<sol_defs::Execution>>::abi_decode(execution_calldata).map_err(|e| {
        DecodeError::MalformedPayload { standard: STANDARD, message: e.to_string() }
    })?;

    Ok(executions
        .into_iter()
        .map(|e| LowLevelCall { to: e.target, value: e.value, data: e.callData })
        .collect())
}

fn decode_single(execution_calldata: &[u8]) -> Result<Vec<LowLevelCall>, DecodeError> {
    if execution_calldata.len() < PACKED_SINGLE_HEADER {
        return Err(DecodeError::MalformedPayload {
            standard: STANDARD,
            message: format!(
                "packed single call is {} bytes, need at least {PACKED_SINGLE_HEADER}",
                execution_calldata.len()
            ),
        });
    }

    let to = Address::from_slice(&execution_calldata[..20]);
    let value = U256::from_be_slice(&execution_calldata[20..PACKED_SINGLE_HEADER]);
    let data = execution_calldata[PACKED_SINGLE_HEADER..].to_vec();

    Ok(vec![LowLevelCall { to, value, data: data.into() }])
}

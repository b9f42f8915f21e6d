//! Decoding shapes for the ERC-4337 reference account (`SimpleAccount`).
//!
//! Shapes are attempted in order: the self-describing `executeBatch` first,
//! the single `execute` last.

use alloy_sol_types::SolCall;
use opguard_primitives::LowLevelCall;

use crate::DecodeError;

pub(crate) mod sol_defs {
    use alloy_sol_types::sol;

    sol! {
        /// `SimpleAccount.execute(address dest, uint256 value, bytes func)`
        function execute(address dest, uint256 value, bytes func);
        /// `SimpleAccount.executeBatch(address[] dest, uint256[] value, bytes[] func)`
        function executeBatch(address[] dest, uint256[] value, bytes[] func);
    }
}

const STANDARD: &str = "simple-account";

/// Attempts every `SimpleAccount` shape against the call data, batch first.
pub fn decode(call_data: &[u8]) -> Result<Option<Vec<LowLevelCall>>, DecodeError> {
    if let Some(calls) = attempt_batch(call_data)? {
        return Ok(Some(calls));
    }
    attempt_single(call_data)
}

fn attempt_batch(call_data: &[u8]) -> Result<Option<Vec<LowLevelCall>>, DecodeError> {
    if !call_data.starts_with(&sol_defs::executeBatchCall::SELECTOR) {
        return Ok(None);
    }

    let batch = sol_defs::executeBatchCall::abi_decode(call_data).map_err(|e| {
        DecodeError::MalformedPayload { standard: STANDARD, message: e.to_string() }
    })?;

    if batch.dest.len() != batch.value.len() || batch.dest.len() != batch.func.len() {
        return Err(DecodeError::MalformedPayload {
            standard: STANDARD,
            message: format!(
                "batch array length mismatch: {} targets, {} values, {} payloads",
                batch.dest.len(),
                batch.value.len(),
                batch.func.len()
            ),
        });
    }

    let calls = batch
        .dest
        .into_iter()
        .zip(batch.value)
        .zip(batch.func)
        .map(|((to, value), data)| LowLevelCall { to, value, data })
        .collect();
    Ok(Some(calls))
}

fn attempt_single(call_data: &[u8]) -> Result<Option<Vec<LowLevelCall>>, DecodeError> {
    if !call_data.starts_with(&sol_defs::executeCall::SELECTOR) {
        return Ok(None);
    }

    let single = sol_defs::executeCall::abi_decode(call_data).map_err(|e| {
        DecodeError::MalformedPayload { standard: STANDARD, message: e.to_string() }
    })?;

    Ok(Some(vec![LowLevelCall { to: single.dest, value: single.value, data: single.func }]))
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, Bytes, U256, bytes};

    use super::*;

    #[test]
    fn batch_round_trips_in_order() {
        let original = vec![
            LowLevelCall {
                to: Address::repeat_byte(0x11),
                value: U256::from(1),
                data: bytes!("aabb"),
            },
            LowLevelCall {
                to: Address::repeat_byte(0x22),
                value: U256::from(2),
                data: bytes!("ccdd"),
            },
        ];

        let encoded = sol_defs::executeBatchCall {
            dest: original.iter().map(|c| c.to).collect(),
            value: original.iter().map(|c| c.value).collect(),
            func: original.iter().map(|c| c.data.clone()).collect(),
        }
        .abi_encode();

        let decoded = decode(&encoded).unwrap().unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn single_round_trips() {
        let encoded = sol_defs::executeCall {
            dest: Address::repeat_byte(0x33),
            value: U256::from(7),
            func: bytes!("deadbeef"),
        }
        .abi_encode();

        let decoded = decode(&encoded).unwrap().unwrap();
        assert_eq!(
            decoded,
            vec![LowLevelCall {
                to: Address::repeat_byte(0x33),
                value: U256::from(7),
                data: bytes!("deadbeef"),
            }]
        );
    }

    #[test]
    fn truncated_batch_is_malformed() {
        let mut encoded = sol_defs::executeBatchCall {
            dest: vec![Address::repeat_byte(0x11)],
            value: vec![U256::ZERO],
            func: vec![Bytes::new()],
        }
        .abi_encode();
        encoded.truncate(16);

        let err = decode(&encoded).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedPayload { standard: "simple-account", .. }));
    }

    #[test]
    fn foreign_selector_does_not_match() {
        assert_eq!(decode(&[0x01, 0x02, 0x03, 0x04]).unwrap(), None);
    }
}

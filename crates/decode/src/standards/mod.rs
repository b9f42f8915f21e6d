//! Supported smart-account call-encoding standards and the shape dispatcher.

pub mod erc7579;
pub mod simple_account;

use opguard_primitives::LowLevelCall;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::DecodeError;

/// The smart-account standard a piece of call data is encoded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccountStandard {
    /// The ERC-4337 reference account: `execute` / `executeBatch`.
    SimpleAccount,
    /// ERC-7579 modular accounts: `execute(bytes32 mode, bytes calldata)`.
    Erc7579,
}

impl AccountStandard {
    /// Every supported standard, in probe order.
    pub const ALL: [Self; 2] = [Self::SimpleAccount, Self::Erc7579];

    /// The standard's display name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SimpleAccount => "simple-account",
            Self::Erc7579 => "erc-7579",
        }
    }

    /// Runs this standard's ordered shape list against the call data.
    ///
    /// Returns `Ok(None)` when no shape of this standard matches, the decoded
    /// calls on a match, and an error when a shape matched structurally but
    /// the payload is malformed or requests a blocked execution mode.
    fn attempt(&self, call_data: &[u8]) -> Result<Option<Vec<LowLevelCall>>, DecodeError> {
        match self {
            Self::SimpleAccount => simple_account::decode(call_data),
            Self::Erc7579 => erc7579::decode(call_data),
        }
    }
}

impl std::fmt::Display for AccountStandard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Decodes account call data into its ordered list of low-level calls.
///
/// When `standard` is declared, only that standard's shapes are attempted.
/// When it is `None` the standard is inferred by probing every supported
/// standard: exactly one must claim the input, otherwise decoding fails with
/// [`DecodeError::UnsupportedShape`] or [`DecodeError::AmbiguousStandards`].
pub fn decode_calls(
    standard: Option<AccountStandard>,
    call_data: &[u8],
) -> Result<Vec<LowLevelCall>, DecodeError> {
    if let Some(declared) = standard {
        let calls = declared.attempt(call_data)?.ok_or(DecodeError::UnsupportedShape)?;
        debug!(standard = %declared, calls = calls.len(), "decoded call data");
        return Ok(calls);
    }

    let mut matched: Option<(AccountStandard, Vec<LowLevelCall>)> = None;
    for candidate in AccountStandard::ALL {
        if let Some(calls) = candidate.attempt(call_data)? {
            if matched.is_some() {
                return Err(DecodeError::AmbiguousStandards);
            }
            matched = Some((candidate, calls));
        }
    }

    match matched {
        Some((standard, calls)) => {
            debug!(standard = %standard, calls = calls.len(), "inferred call-data standard");
            Ok(calls)
        }
        None => Err(DecodeError::UnsupportedShape),
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, Bytes, U256};
    use alloy_sol_types::SolCall;

    use super::*;

    fn call(to: Address, value: u64, data: &[u8]) -> LowLevelCall {
        LowLevelCall { to, value: U256::from(value), data: Bytes::copy_from_slice(data) }
    }

    #[test]
    fn infers_single_matching_standard() {
        let encoded = simple_account::sol_defs::executeCall {
            dest: Address::repeat_byte(0x22),
            value: U256::from(5),
            func: Bytes::from(vec![0xde, 0xad]),
        }
        .abi_encode();

        let calls = decode_calls(None, &encoded).unwrap();
        assert_eq!(calls, vec![call(Address::repeat_byte(0x22), 5, &[0xde, 0xad])]);
    }

    #[test]
    fn declared_standard_skips_others() {
        let encoded = simple_account::sol_defs::executeCall {
            dest: Address::repeat_byte(0x22),
            value: U256::ZERO,
            func: Bytes::new(),
        }
        .abi_encode();

        let err = decode_calls(Some(AccountStandard::Erc7579), &encoded).unwrap_err();
        assert_eq!(err, DecodeError::UnsupportedShape);
    }

    #[test]
    fn unknown_selector_is_unsupported() {
        let err = decode_calls(None, &[0xde, 0xad, 0xbe, 0xef, 0x00]).unwrap_err();
        assert_eq!(err, DecodeError::UnsupportedShape);
    }

    #[test]
    fn empty_call_data_is_unsupported() {
        assert_eq!(decode_calls(None, &[]).unwrap_err(), DecodeError::UnsupportedShape);
    }
}

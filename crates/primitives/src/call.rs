//! Canonical low-level calls extracted from account-specific call encodings.

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// A single `{to, value, data}` call extracted from an operation's call data.
///
/// Produced only by the call-data decoder. An operation yields an ordered
/// sequence of these; the order matches on-chain execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowLevelCall {
    /// The call target.
    pub to: Address,
    /// The native value forwarded with the call.
    pub value: U256,
    /// The call data forwarded to the target.
    pub data: Bytes,
}

/// The result of decoding a low-level call against the set of known function
/// ABIs.
///
/// One of these is produced for every sub-call before any validation runs.
/// The `error` kind is data for the caller-supplied validator, not a pipeline
/// abort: a call to an unknown contract is still a valid call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DecodedCall {
    /// The call data matched a known function.
    #[serde(rename_all = "camelCase")]
    Decoded {
        /// The name of the matched function.
        function: String,
        /// The decoded arguments, keyed by parameter name.
        args: serde_json::Value,
    },
    /// The call data did not match any known function.
    #[serde(rename_all = "camelCase")]
    Error {
        /// Why the call data could not be decoded.
        message: String,
    },
}

impl DecodedCall {
    /// Returns the matched function name, if the call decoded.
    pub fn function(&self) -> Option<&str> {
        match self {
            Self::Decoded { function, .. } => Some(function),
            Self::Error { .. } => None,
        }
    }
}

//! Signing-template and validity-window types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A declarative typed-data skeleton for account-specific signing payloads.
///
/// `domain` and `message` are JSON trees whose string leaves may be
/// `$`-prefixed [references](crate::TemplateReference); `types` declares the
/// EIP-712 struct types the resolved message is coerced against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningTemplate {
    /// The EIP-712 domain, possibly containing references.
    pub domain: Value,
    /// The EIP-712 type declarations.
    pub types: Value,
    /// The name of the primary type within `types`.
    pub primary_type: String,
    /// The message tree, possibly containing references.
    pub message: Value,
}

/// The time window a delegated signature is valid for, in unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidityWindow {
    /// The signature is invalid before this timestamp.
    pub valid_after: u64,
    /// The signature is invalid after this timestamp.
    pub valid_until: u64,
}

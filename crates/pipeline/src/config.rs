//! Per-request operation parameters and account configuration.

use alloy_primitives::Address;
use opguard_decode::AccountStandard;
use opguard_eip712::{SigningTemplate, ValidityWindow};
use opguard_primitives::Operation;

/// How a smart account expects its user operations to be signed.
#[derive(Debug, Clone)]
pub enum SigningConvention {
    /// The default ERC-4337 convention: personal-sign over the operation's
    /// entry-point hash.
    UserOpHash,
    /// Accounts with an installed validator module (session keys with a
    /// validity window): sign the module's typed-data payload, produced by
    /// resolving the account's signing template.
    Eip712 {
        /// The validator module the signature is addressed to.
        module: Address,
        /// The account's signing template.
        template: SigningTemplate,
        /// The window the signature is valid for.
        validity_window: ValidityWindow,
    },
}

/// The smart-account configuration a user operation is processed under.
#[derive(Debug, Clone)]
pub struct AccountConfig {
    /// The account's call-encoding standard. `None` lets the decoder infer
    /// it by probing every supported standard.
    pub standard: Option<AccountStandard>,
    /// The entry point the operation goes through.
    pub entry_point: Address,
    /// The account's signing convention.
    pub signing: SigningConvention,
}

/// One request's worth of input to the pipeline.
#[derive(Debug, Clone)]
pub struct OperationParams {
    /// The operation to authorize and sign.
    pub operation: Operation,
    /// The account configuration. Required for user operations; ignored for
    /// plain transactions.
    pub account: Option<AccountConfig>,
}

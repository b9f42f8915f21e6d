//! The closed set of symbolic references a template may use.

use std::str::FromStr;

use crate::ReferenceResolutionError;

/// The sigil marking a string leaf as a reference.
pub const REFERENCE_SIGIL: char = '$';

/// A symbolic reference in a signing template.
///
/// This is a closed enumeration: adding a new reference means adding a
/// variant here and a resolution arm in the resolver, not parsing new string
/// shapes at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateReference {
    /// `$userOp.sender` — the operation's sending account.
    UserOpSender,
    /// `$userOp.nonce` — the operation's nonce.
    UserOpNonce,
    /// `$userOp.callData` — the operation's call data, hex-encoded.
    UserOpCallData,
    /// `$userOp.initCode` — `factory ++ factoryData` when both are present,
    /// the empty-bytes sentinel `0x` otherwise.
    UserOpInitCode,
    /// `$userOp.hash` — the operation's entry-point hash.
    UserOpHash,
    /// `$validUntil` — end of the signature validity window.
    ValidUntil,
    /// `$validAfter` — start of the signature validity window.
    ValidAfter,
    /// `$chainId` — the target chain id.
    ChainId,
    /// `$moduleAddress` — the configured validator module.
    ModuleAddress,
    /// `$entryPoint` — the configured entry point contract.
    EntryPoint,
}

impl TemplateReference {
    /// The reference's canonical spelling, sigil included.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::UserOpSender => "$userOp.sender",
            Self::UserOpNonce => "$userOp.nonce",
            Self::UserOpCallData => "$userOp.callData",
            Self::UserOpInitCode => "$userOp.initCode",
            Self::UserOpHash => "$userOp.hash",
            Self::ValidUntil => "$validUntil",
            Self::ValidAfter => "$validAfter",
            Self::ChainId => "$chainId",
            Self::ModuleAddress => "$moduleAddress",
            Self::EntryPoint => "$entryPoint",
        }
    }
}

impl FromStr for TemplateReference {
    type Err = ReferenceResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "$userOp.sender" => Ok(Self::UserOpSender),
            "$userOp.nonce" => Ok(Self::UserOpNonce),
            "$userOp.callData" => Ok(Self::UserOpCallData),
            "$userOp.initCode" => Ok(Self::UserOpInitCode),
            "$userOp.hash" => Ok(Self::UserOpHash),
            "$validUntil" => Ok(Self::ValidUntil),
            "$validAfter" => Ok(Self::ValidAfter),
            "$chainId" => Ok(Self::ChainId),
            "$moduleAddress" => Ok(Self::ModuleAddress),
            "$entryPoint" => Ok(Self::EntryPoint),
            other => {
                Err(ReferenceResolutionError::UnknownReference { reference: other.to_string() })
            }
        }
    }
}

impl std::fmt::Display for TemplateReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

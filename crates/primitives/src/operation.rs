//! Operations submitted for authorization and signing: either a plain
//! transaction or an ERC-4337 user operation, never both.

use alloy_primitives::{Address, Bytes, ChainId, U256};
use serde::{Deserialize, Serialize};

/// A plain transaction to be validated and signed.
///
/// Carries either EIP-1559 fee fields or a legacy `gasPrice`; the signer
/// picks the transaction envelope accordingly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The sending account.
    pub from: Address,
    /// The call target.
    pub to: Address,
    /// The native value transferred.
    pub value: U256,
    /// The call data.
    pub input: Bytes,
    /// The account nonce.
    pub nonce: u64,
    /// The chain the transaction is bound to.
    pub chain_id: ChainId,
    /// The gas limit.
    pub gas_limit: u64,
    /// EIP-1559 max fee per gas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<u128>,
    /// EIP-1559 max priority fee per gas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<u128>,
    /// Legacy gas price. Ignored when the EIP-1559 fields are set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<u128>,
}

impl Transaction {
    /// Returns true if this transaction carries EIP-1559 fee fields.
    pub const fn is_eip1559(&self) -> bool {
        self.max_fee_per_gas.is_some()
    }
}

/// An ERC-4337 user operation in the v0.7 unpacked shape.
///
/// The optional `factory`/`factoryData` pair replaces the v0.6 `initCode`
/// blob; [`UserOperation::init_code`] reconstructs the concatenated form
/// where the v0.6 wire layout is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperation {
    /// The smart account sending the operation.
    pub sender: Address,
    /// The account nonce (key-prefixed per ERC-4337).
    pub nonce: U256,
    /// The account factory, set only when the account is not yet deployed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory: Option<Address>,
    /// The call data passed to the factory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory_data: Option<Bytes>,
    /// The call data executed by the account.
    pub call_data: Bytes,
    /// Gas limit for the execution phase.
    pub call_gas_limit: U256,
    /// Gas limit for the verification phase.
    pub verification_gas_limit: U256,
    /// Gas paid to compensate the bundler for pre-verification work.
    pub pre_verification_gas: U256,
    /// Max fee per gas.
    pub max_fee_per_gas: U256,
    /// Max priority fee per gas.
    pub max_priority_fee_per_gas: U256,
    /// The paymaster sponsoring the operation, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster: Option<Address>,
    /// Gas limit for paymaster verification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster_verification_gas_limit: Option<U256>,
    /// Gas limit for the paymaster post-op call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster_post_op_gas_limit: Option<U256>,
    /// Extra data passed to the paymaster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paymaster_data: Option<Bytes>,
    /// The operation signature. A placeholder until the signing stage runs.
    #[serde(default)]
    pub signature: Bytes,
}

impl UserOperation {
    /// Reconstructs the v0.6 `initCode` blob: `factory ++ factoryData` when
    /// both are present, empty bytes otherwise.
    pub fn init_code(&self) -> Bytes {
        match (&self.factory, &self.factory_data) {
            (Some(factory), Some(data)) => {
                let mut out = Vec::with_capacity(20 + data.len());
                out.extend_from_slice(factory.as_slice());
                out.extend_from_slice(data);
                out.into()
            }
            _ => Bytes::new(),
        }
    }

    /// Packs the paymaster fields into the v0.7 `paymasterAndData` blob:
    /// `paymaster ++ verificationGasLimit(16) ++ postOpGasLimit(16) ++ data`,
    /// empty bytes when no paymaster is set.
    pub fn paymaster_and_data(&self) -> Bytes {
        let Some(paymaster) = self.paymaster else {
            return Bytes::new();
        };
        let verification = self.paymaster_verification_gas_limit.unwrap_or_default();
        let post_op = self.paymaster_post_op_gas_limit.unwrap_or_default();
        let data = self.paymaster_data.clone().unwrap_or_default();

        let mut out = Vec::with_capacity(20 + 32 + data.len());
        out.extend_from_slice(paymaster.as_slice());
        out.extend_from_slice(&verification.saturating_to::<u128>().to_be_bytes());
        out.extend_from_slice(&post_op.saturating_to::<u128>().to_be_bytes());
        out.extend_from_slice(&data);
        out.into()
    }

    /// Returns a copy of this operation with the signature replaced.
    pub fn with_signature(mut self, signature: Bytes) -> Self {
        self.signature = signature;
        self
    }
}

/// An operation submitted for authorization and signing.
///
/// Exactly one of the two shapes is present per request; the untagged serde
/// representation picks the variant from the fields supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operation {
    /// A plain transaction.
    Transaction(Transaction),
    /// An ERC-4337 user operation.
    UserOperation(UserOperation),
}

impl Operation {
    /// Returns the sending account of this operation.
    pub const fn sender(&self) -> Address {
        match self {
            Self::Transaction(tx) => tx.from,
            Self::UserOperation(op) => op.sender,
        }
    }
}

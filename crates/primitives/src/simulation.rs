//! Asset-change snapshots reported by the external simulator.

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// The kind of asset a simulated change touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetType {
    /// The chain's native asset.
    Native,
    /// An ERC-20 token.
    Erc20,
    /// An ERC-721 token.
    Erc721,
    /// An ERC-1155 token.
    Erc1155,
    /// A provider-specific asset class outside the standard set.
    Special,
}

/// The kind of state change a simulated asset movement represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeType {
    /// An allowance was granted.
    Approve,
    /// An asset moved between accounts.
    Transfer,
}

/// One asset movement observed during simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetChange {
    /// The asset class.
    pub asset_type: AssetType,
    /// Whether this is an approval or a transfer.
    pub change_type: ChangeType,
    /// The account the asset moves from (or the approver).
    pub from: Address,
    /// The account the asset moves to (or the spender).
    pub to: Address,
    /// The amount moved or approved.
    pub amount: U256,
    /// The token contract, absent for native transfers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_address: Option<Address>,
    /// The token id for ERC-721/ERC-1155 changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<U256>,
    /// Token decimals, when the simulator reports them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
    /// Token symbol, when the simulator reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Raw token metadata the simulator attached to this change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<Bytes>,
}

/// The error a simulator attaches to a failed simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationFailure {
    /// The simulator's error message.
    pub message: String,
    /// The revert reason, when execution reverted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revert_reason: Option<String>,
}

/// An immutable snapshot of a simulation run, as returned by the external
/// simulator. Never mutated by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// The asset changes the operation would cause.
    pub changes: Vec<AssetChange>,
    /// Set when the simulator reported a failure. The pipeline treats any
    /// error as fatal and discards `changes`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SimulationFailure>,
}

impl SimulationResult {
    /// A successful simulation with the given changes.
    pub fn ok(changes: Vec<AssetChange>) -> Self {
        Self { changes, error: None }
    }
}

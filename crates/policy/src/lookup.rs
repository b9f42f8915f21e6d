//! The on-chain policy registry lookup, consumed read-only.

use alloy_primitives::Address;
use async_trait::async_trait;
use serde_json::Value;

/// One policy permitted for a delegation, as recorded on-chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermittedPolicy {
    /// The content id of the permitted policy's published code.
    pub ipfs_cid: String,
    /// The policy parameters the delegator encoded when granting the
    /// permission.
    pub parameters: Value,
}

/// Read-only lookup of which policies a delegator permitted for a delegatee
/// and action.
///
/// Backed by on-chain storage elsewhere; this core only reads. Hosts resolve
/// the returned content ids against their policy implementations before
/// assembling a [`PolicyRegistry`](crate::PolicyRegistry).
#[async_trait]
pub trait PolicyLookup: Send + Sync {
    /// The error type returned by lookups.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the policies the delegator permitted for the given delegatee
    /// and action, with their encoded parameters.
    async fn permitted_policies(
        &self,
        delegatee: Address,
        delegator: &str,
        action_cid: &str,
    ) -> Result<Vec<PermittedPolicy>, Self::Error>;
}

//! Caller-supplied validation predicates.

use alloy_primitives::{Address, ChainId};
use async_trait::async_trait;
use opguard_primitives::{AssetChange, DecodedCall, LowLevelCall};

use crate::ValidationError;

/// One decoded call as presented to the per-call predicate.
#[derive(Debug, Clone, Copy)]
pub struct CallView<'a> {
    /// The call's position in execution order.
    pub index: usize,
    /// The raw low-level call.
    pub call: &'a LowLevelCall,
    /// The call decoded against the known function set.
    pub decoded: &'a DecodedCall,
    /// The chain the operation targets.
    pub chain_id: ChainId,
    /// The operation's sending account.
    pub sender: Address,
}

/// The business rules an operation must pass before it is simulated and
/// signed.
///
/// Both predicates may suspend — fetching a dynamic allow-list is the
/// typical case — and the pipeline awaits each one before moving on. Any
/// error aborts the request with the predicate's message.
#[async_trait]
pub trait OperationValidator: Send + Sync {
    /// Validates one decoded call. Called once per call, in execution order.
    async fn validate_call(&self, call: &CallView<'_>) -> Result<(), ValidationError>;

    /// Validates the full simulation's asset-change list.
    async fn validate_simulation(&self, changes: &[AssetChange]) -> Result<(), ValidationError>;
}

#[async_trait]
impl<T: OperationValidator> OperationValidator for std::sync::Arc<T> {
    async fn validate_call(&self, call: &CallView<'_>) -> Result<(), ValidationError> {
        (**self).validate_call(call).await
    }

    async fn validate_simulation(&self, changes: &[AssetChange]) -> Result<(), ValidationError> {
        (**self).validate_simulation(changes).await
    }
}

/// A validator that accepts everything. Useful for hosts that gate
/// operations entirely through policies, and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

#[async_trait]
impl OperationValidator for AllowAll {
    async fn validate_call(&self, _call: &CallView<'_>) -> Result<(), ValidationError> {
        Ok(())
    }

    async fn validate_simulation(&self, _changes: &[AssetChange]) -> Result<(), ValidationError> {
        Ok(())
    }
}

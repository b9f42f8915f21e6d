//! Transport-agnostic chain RPC provider trait.

use alloy_primitives::{Address, ChainId};
use async_trait::async_trait;
use opguard_primitives::{SimulationResult, Transaction, UserOperation};

/// The chain-facing collaborator the pipeline consumes.
///
/// This trait carries no transport bounds so hosts can plug in an HTTP
/// provider, a websocket provider, or an in-process fake in tests. The
/// pipeline calls `chain_id` once per request and passes the result down;
/// simulation runs against the full operation, side-effect free.
#[async_trait]
pub trait ChainRpcProvider: Send + Sync {
    /// The error type returned by provider operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the chain id the provider is connected to.
    async fn chain_id(&self) -> Result<ChainId, Self::Error>;

    /// Simulates a plain transaction and reports its asset changes.
    async fn simulate_transaction(
        &self,
        tx: &Transaction,
    ) -> Result<SimulationResult, Self::Error>;

    /// Simulates a user operation through the given entry point and reports
    /// its asset changes.
    async fn simulate_user_operation(
        &self,
        op: &UserOperation,
        entry_point: Address,
    ) -> Result<SimulationResult, Self::Error>;

    /// Probes whether a validator module is installed on a smart account.
    async fn is_module_installed(
        &self,
        account: Address,
        module: Address,
    ) -> Result<bool, Self::Error>;
}

#[async_trait]
impl<T: ChainRpcProvider> ChainRpcProvider for std::sync::Arc<T> {
    type Error = T::Error;

    async fn chain_id(&self) -> Result<ChainId, Self::Error> {
        (**self).chain_id().await
    }

    async fn simulate_transaction(
        &self,
        tx: &Transaction,
    ) -> Result<SimulationResult, Self::Error> {
        (**self).simulate_transaction(tx).await
    }

    async fn simulate_user_operation(
        &self,
        op: &UserOperation,
        entry_point: Address,
    ) -> Result<SimulationResult, Self::Error> {
        (**self).simulate_user_operation(op, entry_point).await
    }

    async fn is_module_installed(
        &self,
        account: Address,
        module: Address,
    ) -> Result<bool, Self::Error> {
        (**self).is_module_installed(account, module).await
    }
}

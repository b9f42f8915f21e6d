//! The pipeline orchestrator.

use alloy_primitives::ChainId;
use opguard_decode::{decode_calls, decode_known_function};
use opguard_eip712::{ResolveContext, resolve_template};
use opguard_primitives::{
    AssetChange, LowLevelCall, Operation, SimulationResult, entry_points::hash_user_operation,
};
use opguard_signer::DelegatedSigner;
use tracing::{debug, info, warn};

use crate::{
    AccountConfig, CallView, ChainRpcProvider, ExecuteData, ExecuteOutcome, OperationParams,
    OperationValidator, PipelineError, PrecheckData, PrecheckOutcome, SigningConvention,
    SimulationError,
};

/// Everything the shared check stages established about an operation.
struct CheckedOperation {
    chain_id: ChainId,
    simulation_changes: Vec<AssetChange>,
}

/// The per-request pipeline over an injected provider and validator.
///
/// Holds no mutable state: every request runs its own decode/validate/
/// simulate/sign chain, and concurrent requests need no locking.
#[derive(Debug, Clone)]
pub struct GuardPipeline<P, V> {
    provider: P,
    validator: V,
}

impl<P, V> GuardPipeline<P, V>
where
    P: ChainRpcProvider,
    V: OperationValidator,
{
    /// Builds a pipeline over the given provider and validator.
    pub const fn new(provider: P, validator: V) -> Self {
        Self { provider, validator }
    }

    /// Runs decode, per-call validation, simulation and simulation
    /// validation, without signing.
    ///
    /// Always resolves: every stage failure is folded into a structured
    /// failure outcome at this boundary.
    pub async fn precheck(&self, params: &OperationParams) -> PrecheckOutcome {
        info!(sender = %params.operation.sender(), "running precheck");
        match self.run_checks(params).await {
            Ok(checked) => PrecheckOutcome::Success(PrecheckData {
                simulation_changes: checked.simulation_changes,
            }),
            Err(e) => {
                warn!(error = %e, "precheck aborted");
                PrecheckOutcome::Failure { runtime_error: e.to_string() }
            }
        }
    }

    /// Runs the full chain and signs the operation with the given signer.
    ///
    /// Always resolves. On failure no signature is produced — there is no
    /// "signed but not validated" state to observe.
    pub async fn execute(
        &self,
        params: &OperationParams,
        signer: &DelegatedSigner,
    ) -> ExecuteOutcome {
        info!(sender = %params.operation.sender(), signer = %signer.address(), "running execute");
        match self.run_to_signature(params, signer).await {
            Ok(data) => ExecuteOutcome::Success(data),
            Err(e) => {
                warn!(error = %e, "execute aborted");
                ExecuteOutcome::Failure { runtime_error: e.to_string() }
            }
        }
    }

    /// The shared Decode -> PerCallValidate -> Simulate -> SimulationValidate
    /// chain. Each stage awaits fully before the next begins.
    async fn run_checks(&self, params: &OperationParams) -> Result<CheckedOperation, PipelineError> {
        let chain_id = self.provider.chain_id().await.map_err(provider_error)?;
        let sender = params.operation.sender();

        // Decode. Any sub-call failing to extract aborts the whole request;
        // partial success is not a valid outcome.
        let calls = extract_calls(params)?;
        debug!(calls = calls.len(), "decoded operation");

        // Per-call validation, in execution order.
        for (index, call) in calls.iter().enumerate() {
            let decoded = decode_known_function(call);
            let view = CallView { index, call, decoded: &decoded, chain_id, sender };
            self.validator.validate_call(&view).await?;
        }
        debug!("per-call validation passed");

        // Simulate the full operation.
        let result = match &params.operation {
            Operation::Transaction(tx) => {
                self.provider.simulate_transaction(tx).await.map_err(provider_error)?
            }
            Operation::UserOperation(op) => {
                let account = account_config(params)?;
                self.provider
                    .simulate_user_operation(op, account.entry_point)
                    .await
                    .map_err(provider_error)?
            }
        };
        let simulation_changes = ensure_simulation_ok(result)?;
        debug!(changes = simulation_changes.len(), "simulation passed");

        // Validate what the simulation says would happen.
        self.validator.validate_simulation(&simulation_changes).await?;
        debug!("simulation validation passed");

        Ok(CheckedOperation { chain_id, simulation_changes })
    }

    async fn run_to_signature(
        &self,
        params: &OperationParams,
        signer: &DelegatedSigner,
    ) -> Result<ExecuteData, PipelineError> {
        let checked = self.run_checks(params).await?;

        match &params.operation {
            Operation::Transaction(tx) => {
                let signed = signer.sign_transaction(tx).await?;
                debug!(hash = %signed.hash, "transaction signed");
                Ok(ExecuteData {
                    signature: signed.signature.as_bytes(),
                    simulation_changes: checked.simulation_changes,
                    modified_operation: None,
                    raw_transaction: Some(signed.raw),
                })
            }
            Operation::UserOperation(op) => {
                let account = account_config(params)?;
                let signature = match &account.signing {
                    SigningConvention::UserOpHash => {
                        let hash = hash_user_operation(op, account.entry_point, checked.chain_id)?;
                        signer.sign_message(hash.as_slice()).await?
                    }
                    SigningConvention::Eip712 { module, template, validity_window } => {
                        let installed = self
                            .provider
                            .is_module_installed(op.sender, *module)
                            .await
                            .map_err(provider_error)?;
                        if !installed {
                            return Err(PipelineError::ModuleNotInstalled {
                                account: op.sender,
                                module: *module,
                            });
                        }

                        let cx = ResolveContext {
                            user_op: op,
                            chain_id: checked.chain_id,
                            // Optional here: templates that don't reference
                            // the hash must not fail on an exotic entry point.
                            user_op_hash: hash_user_operation(
                                op,
                                account.entry_point,
                                checked.chain_id,
                            )
                            .ok(),
                            validity_window: Some(*validity_window),
                            module_address: Some(*module),
                            entry_point: Some(account.entry_point),
                        };
                        let typed = resolve_template(template, &cx)?;
                        signer.sign_typed_data(&typed).await?
                    }
                };

                debug!("user operation signed");
                let signature_bytes = signature.as_bytes();
                Ok(ExecuteData {
                    signature: signature_bytes.clone(),
                    simulation_changes: checked.simulation_changes,
                    modified_operation: Some(op.clone().with_signature(signature_bytes)),
                    raw_transaction: None,
                })
            }
        }
    }
}

/// Extracts the ordered low-level calls an operation executes.
fn extract_calls(params: &OperationParams) -> Result<Vec<LowLevelCall>, PipelineError> {
    match &params.operation {
        // A plain transaction is exactly one implicit call.
        Operation::Transaction(tx) => {
            Ok(vec![LowLevelCall { to: tx.to, value: tx.value, data: tx.input.clone() }])
        }
        Operation::UserOperation(op) => {
            let standard = account_config(params)?.standard;
            Ok(decode_calls(standard, &op.call_data)?)
        }
    }
}

fn account_config(params: &OperationParams) -> Result<&AccountConfig, PipelineError> {
    params.account.as_ref().ok_or(PipelineError::MissingAccountConfig)
}

/// Fail-closed simulation handling: any simulator-reported error discards
/// the changes, even when the simulator populated them.
fn ensure_simulation_ok(result: SimulationResult) -> Result<Vec<AssetChange>, SimulationError> {
    match result.error {
        Some(failure) => Err(failure.into()),
        None => Ok(result.changes),
    }
}

fn provider_error<E: std::error::Error>(e: E) -> PipelineError {
    PipelineError::Provider(e.to_string())
}

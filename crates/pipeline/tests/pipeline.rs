//! End-to-end pipeline tests over in-process fakes.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use alloy_primitives::{Address, B256, Bytes, ChainId, U256, address, bytes};
use alloy_sol_types::{SolCall, sol};
use async_trait::async_trait;
use eyre::Result;
use opguard_decode::AccountStandard;
use opguard_eip712::{SigningTemplate, ValidityWindow};
use opguard_pipeline::{
    AccountConfig, AllowAll, CallView, ChainRpcProvider, GuardPipeline, OperationParams,
    OperationValidator, SigningConvention, ValidationError,
};
use opguard_primitives::{
    AssetChange, AssetType, ChangeType, Operation, SimulationFailure, SimulationResult,
    Transaction, UserOperation,
};
use opguard_signer::{DelegatedSigner, RemoteSignature, RemoteSigner, SigningError};
use serde_json::json;
use tokio::sync::Mutex;

sol! {
    function executeBatch(address[] dest, uint256[] value, bytes[] func);
}

const PUBLIC_KEY: &str = "0x04e68acfc0253a10620dff706b0a1b1f1f5833ea3beb3bde2250d5f271f3563606672ebc45e0b7ea2e816ecb70ca03137b1c9476eec63d4632e990020b7b6fba39";
const ENTRY_POINT_V07: Address = address!("0x0000000071727De22E5E9d8BAf0edAc6f37da032");

/// A provider that replays canned simulation results.
struct FakeProvider {
    chain_id: ChainId,
    simulation: SimulationResult,
    module_installed: bool,
    simulations: AtomicU32,
}

impl FakeProvider {
    fn new(simulation: SimulationResult) -> Self {
        Self { chain_id: 8453, simulation, module_installed: true, simulations: AtomicU32::new(0) }
    }
}

#[async_trait]
impl ChainRpcProvider for FakeProvider {
    type Error = std::convert::Infallible;

    async fn chain_id(&self) -> Result<ChainId, Self::Error> {
        Ok(self.chain_id)
    }

    async fn simulate_transaction(&self, _tx: &Transaction) -> Result<SimulationResult, Self::Error> {
        self.simulations.fetch_add(1, Ordering::SeqCst);
        Ok(self.simulation.clone())
    }

    async fn simulate_user_operation(
        &self,
        _op: &UserOperation,
        _entry_point: Address,
    ) -> Result<SimulationResult, Self::Error> {
        self.simulations.fetch_add(1, Ordering::SeqCst);
        Ok(self.simulation.clone())
    }

    async fn is_module_installed(
        &self,
        _account: Address,
        _module: Address,
    ) -> Result<bool, Self::Error> {
        Ok(self.module_installed)
    }
}

/// A remote signer that replays a canned response and counts invocations.
struct FakeRemote {
    response: RemoteSignature,
    signs: AtomicU32,
}

impl FakeRemote {
    fn healthy() -> Self {
        Self {
            response: RemoteSignature {
                r: Some(Bytes::from(vec![0x11; 32])),
                s: Some(Bytes::from(vec![0x22; 32])),
                recovery_id: Some(0),
            },
            signs: AtomicU32::new(0),
        }
    }

    fn incomplete() -> Self {
        Self {
            response: RemoteSignature {
                r: Some(Bytes::from(vec![0x01])),
                s: None,
                recovery_id: None,
            },
            signs: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl RemoteSigner for FakeRemote {
    async fn sign(&self, _digest: B256, _public_key: &str) -> Result<RemoteSignature, SigningError> {
        self.signs.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

/// Records every call presented for validation; optionally rejects one
/// target.
#[derive(Default)]
struct RecordingValidator {
    seen: Mutex<Vec<(usize, Address, Option<String>)>>,
    reject_target: Option<Address>,
}

#[async_trait]
impl OperationValidator for RecordingValidator {
    async fn validate_call(&self, call: &CallView<'_>) -> Result<(), ValidationError> {
        self.seen.lock().await.push((
            call.index,
            call.call.to,
            call.decoded.function().map(str::to_string),
        ));
        if self.reject_target == Some(call.call.to) {
            return Err(ValidationError::call(call.index, "target is not on the allow-list"));
        }
        Ok(())
    }

    async fn validate_simulation(&self, _changes: &[AssetChange]) -> Result<(), ValidationError> {
        Ok(())
    }
}

fn batch_user_op(calls: &[(Address, u64, Bytes)]) -> UserOperation {
    let call_data = executeBatchCall {
        dest: calls.iter().map(|(to, _, _)| *to).collect(),
        value: calls.iter().map(|(_, value, _)| U256::from(*value)).collect(),
        func: calls.iter().map(|(_, _, data)| data.clone()).collect(),
    }
    .abi_encode();

    UserOperation {
        sender: address!("0x1306b01bc3e4ad202612d3843387e94737673f53"),
        nonce: U256::from(1),
        factory: None,
        factory_data: None,
        call_data: call_data.into(),
        call_gas_limit: U256::from(3_000_000),
        verification_gas_limit: U256::from(2_000_000),
        pre_verification_gas: U256::from(100_000),
        max_fee_per_gas: U256::from(2_000_000_000u64),
        max_priority_fee_per_gas: U256::from(1_000_000_000u64),
        paymaster: None,
        paymaster_verification_gas_limit: None,
        paymaster_post_op_gas_limit: None,
        paymaster_data: None,
        signature: Bytes::new(),
    }
}

fn user_op_params(op: UserOperation, signing: SigningConvention) -> OperationParams {
    OperationParams {
        operation: Operation::UserOperation(op),
        account: Some(AccountConfig {
            standard: Some(AccountStandard::SimpleAccount),
            entry_point: ENTRY_POINT_V07,
            signing,
        }),
    }
}

fn transaction_params() -> OperationParams {
    OperationParams {
        operation: Operation::Transaction(Transaction {
            from: address!("0x1306b01bc3e4ad202612d3843387e94737673f53"),
            to: address!("0x2222222222222222222222222222222222222222"),
            value: U256::from(1_000),
            input: Bytes::new(),
            nonce: 4,
            chain_id: 8453,
            gas_limit: 21_000,
            max_fee_per_gas: Some(1_000_000_000),
            max_priority_fee_per_gas: Some(1_000_000_000),
            gas_price: None,
        }),
        account: None,
    }
}

fn transfer_change() -> AssetChange {
    AssetChange {
        asset_type: AssetType::Erc20,
        change_type: ChangeType::Transfer,
        from: address!("0x1306b01bc3e4ad202612d3843387e94737673f53"),
        to: address!("0x2222222222222222222222222222222222222222"),
        amount: U256::from(1_000),
        token_address: Some(address!("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48")),
        token_id: None,
        decimals: Some(6),
        symbol: Some("USDC".to_string()),
        raw_data: None,
    }
}

fn signer(remote: Arc<FakeRemote>) -> DelegatedSigner {
    DelegatedSigner::new(PUBLIC_KEY, remote).unwrap()
}

#[tokio::test]
async fn batched_call_data_validates_two_calls_in_order() -> Result<()> {
    let first = address!("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
    let second = address!("0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");
    let op = batch_user_op(&[
        (first, 0, bytes!("a9059cbb")),
        (second, 5, Bytes::new()),
    ]);

    let validator = Arc::new(RecordingValidator::default());
    let pipeline = GuardPipeline::new(
        FakeProvider::new(SimulationResult::ok(vec![transfer_change()])),
        validator.clone(),
    );

    let outcome = pipeline.precheck(&user_op_params(op, SigningConvention::UserOpHash)).await;
    assert!(outcome.is_success(), "precheck failed: {:?}", outcome.runtime_error());
    assert_eq!(outcome.simulation_changes().unwrap().len(), 1);

    // Both sub-calls were presented, in batch-index order.
    let seen = validator.seen.lock().await;
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].0, 0);
    assert_eq!(seen[0].1, first);
    assert_eq!(seen[1].0, 1);
    assert_eq!(seen[1].1, second);
    // The empty-data call decoded as a native transfer; the bare selector
    // with no arguments did not decode.
    assert_eq!(seen[1].2.as_deref(), Some("nativeTransfer"));
    assert_eq!(seen[0].2, None);
    Ok(())
}

#[tokio::test]
async fn simulation_revert_reason_is_carried_verbatim() {
    let provider = FakeProvider::new(SimulationResult {
        // Fail-closed: populated changes on an errored simulation must never
        // reach the caller.
        changes: vec![transfer_change()],
        error: Some(SimulationFailure {
            message: "reverted".to_string(),
            revert_reason: Some("insufficient balance".to_string()),
        }),
    });
    let remote = Arc::new(FakeRemote::healthy());
    let pipeline = GuardPipeline::new(provider, AllowAll);

    let outcome = pipeline
        .execute(&transaction_params(), &signer(remote.clone()))
        .await;

    assert!(!outcome.is_success());
    let error = outcome.runtime_error().unwrap();
    assert!(error.contains("insufficient balance"), "error was: {error}");
    assert!(error.contains("reverted"), "error was: {error}");

    // Nothing was signed.
    assert_eq!(remote.signs.load(Ordering::SeqCst), 0);

    let wire = serde_json::to_value(&outcome).unwrap();
    assert_eq!(wire["success"], json!(false));
    assert!(wire.get("result").is_none());
}

#[tokio::test]
async fn incomplete_remote_signature_fails_the_request() {
    let pipeline = GuardPipeline::new(
        FakeProvider::new(SimulationResult::ok(vec![])),
        AllowAll,
    );
    let remote = Arc::new(FakeRemote::incomplete());

    let outcome = pipeline.execute(&transaction_params(), &signer(remote)).await;

    assert_eq!(outcome.runtime_error(), Some("Signed tx missing signature fields"));
}

#[tokio::test]
async fn precheck_is_idempotent_for_identical_simulations() {
    let pipeline = GuardPipeline::new(
        FakeProvider::new(SimulationResult::ok(vec![transfer_change()])),
        AllowAll,
    );
    let params = transaction_params();

    let first = pipeline.precheck(&params).await;
    let second = pipeline.precheck(&params).await;

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn rejected_call_aborts_before_simulation() {
    let blocked = address!("0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");
    let op = batch_user_op(&[(blocked, 0, Bytes::new())]);

    let validator = RecordingValidator { reject_target: Some(blocked), ..Default::default() };
    let provider = Arc::new(FakeProvider::new(SimulationResult::ok(vec![])));
    let pipeline = GuardPipeline::new(provider.clone(), validator);

    let outcome = pipeline.precheck(&user_op_params(op, SigningConvention::UserOpHash)).await;

    assert!(!outcome.is_success());
    assert!(outcome.runtime_error().unwrap().contains("not on the allow-list"));
    assert_eq!(provider.simulations.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn execute_signs_a_plain_transaction() {
    let pipeline = GuardPipeline::new(
        FakeProvider::new(SimulationResult::ok(vec![transfer_change()])),
        AllowAll,
    );
    let remote = Arc::new(FakeRemote::healthy());

    let outcome = pipeline.execute(&transaction_params(), &signer(remote)).await;

    let data = outcome.result().expect("execute should succeed");
    assert_eq!(data.signature.len(), 65);
    assert!(data.raw_transaction.is_some());
    assert!(data.modified_operation.is_none());
    assert_eq!(data.simulation_changes.len(), 1);
}

#[tokio::test]
async fn execute_fills_the_user_operation_signature() {
    let op = batch_user_op(&[(Address::repeat_byte(0x42), 0, Bytes::new())]);
    let pipeline = GuardPipeline::new(
        FakeProvider::new(SimulationResult::ok(vec![])),
        AllowAll,
    );
    let remote = Arc::new(FakeRemote::healthy());

    let outcome = pipeline
        .execute(&user_op_params(op, SigningConvention::UserOpHash), &signer(remote))
        .await;

    let data = outcome.result().expect("execute should succeed");
    let modified = data.modified_operation.as_ref().expect("user op must be returned");
    assert_eq!(modified.signature, data.signature);
    assert_eq!(modified.signature.len(), 65);
    assert!(data.raw_transaction.is_none());
}

fn session_convention() -> SigningConvention {
    SigningConvention::Eip712 {
        module: address!("0x7579757975797579757975797579757975797579"),
        template: SigningTemplate {
            domain: json!({
                "name": "SessionValidator",
                "version": "1",
                "chainId": "$chainId",
                "verifyingContract": "$moduleAddress",
            }),
            types: json!({
                "SessionPermission": [
                    { "name": "account", "type": "address" },
                    { "name": "nonce", "type": "uint256" },
                    { "name": "validAfter", "type": "uint48" },
                    { "name": "validUntil", "type": "uint48" },
                ],
            }),
            primary_type: "SessionPermission".to_string(),
            message: json!({
                "account": "$userOp.sender",
                "nonce": "$userOp.nonce",
                "validAfter": "$validAfter",
                "validUntil": "$validUntil",
            }),
        },
        validity_window: ValidityWindow {
            valid_after: 1_700_000_000,
            valid_until: 1_700_003_600,
        },
    }
}

#[tokio::test]
async fn session_accounts_sign_resolved_typed_data() {
    let op = batch_user_op(&[(Address::repeat_byte(0x42), 0, Bytes::new())]);
    let pipeline = GuardPipeline::new(
        FakeProvider::new(SimulationResult::ok(vec![])),
        AllowAll,
    );
    let remote = Arc::new(FakeRemote::healthy());

    let outcome = pipeline
        .execute(&user_op_params(op, session_convention()), &signer(remote.clone()))
        .await;

    let data = outcome.result().expect("execute should succeed");
    assert_eq!(data.signature.len(), 65);
    assert_eq!(remote.signs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_validator_module_fails_before_signing() {
    let op = batch_user_op(&[(Address::repeat_byte(0x42), 0, Bytes::new())]);
    let mut provider = FakeProvider::new(SimulationResult::ok(vec![]));
    provider.module_installed = false;
    let pipeline = GuardPipeline::new(provider, AllowAll);
    let remote = Arc::new(FakeRemote::healthy());

    let outcome = pipeline
        .execute(&user_op_params(op, session_convention()), &signer(remote.clone()))
        .await;

    assert!(!outcome.is_success());
    assert!(outcome.runtime_error().unwrap().contains("not installed"));
    assert_eq!(remote.signs.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unsupported_call_data_shape_aborts_everything() {
    let mut op = batch_user_op(&[(Address::repeat_byte(0x42), 0, Bytes::new())]);
    op.call_data = bytes!("deadbeef00");

    let provider = Arc::new(FakeProvider::new(SimulationResult::ok(vec![])));
    let pipeline = GuardPipeline::new(provider.clone(), AllowAll);

    let outcome = pipeline.precheck(&user_op_params(op, SigningConvention::UserOpHash)).await;
    assert_eq!(outcome.runtime_error(), Some("unsupported call-data shape"));
    assert_eq!(provider.simulations.load(Ordering::SeqCst), 0);
}

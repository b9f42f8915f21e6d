//! The policy capability trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::PolicyRuntimeError;

/// The parameters a delegated action was invoked with, as passed to every
/// policy. Policies deserialize the subset they care about.
pub type PolicyParams = Value;

/// A single policy's verdict.
///
/// Both payloads are policy-defined JSON; callers recover the typed shape
/// through [`AllowedPolicies::result_of`](crate::AllowedPolicies::result_of)
/// under the policy's package name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyVerdict {
    /// The policy allows the action, with its typed allow-result.
    Allow(Value),
    /// The policy denies the action.
    Deny {
        /// The policy's typed deny-result.
        result: Value,
        /// Set when the denial came from a runtime or schema failure rather
        /// than a considered verdict.
        runtime_error: Option<String>,
    },
}

/// An independently pluggable authorization check.
///
/// Policies run in registry order; `evaluate` is mandatory, `precheck` and
/// `commit` are optional refinements. A policy that records side effects
/// (spend counters, rate windows) does so in `commit`, which only runs after
/// the aggregate outcome — and the guarded execution — succeeded.
#[async_trait]
pub trait Policy: Send + Sync {
    /// The policy's unique package name. Keys its results.
    fn package_name(&self) -> &str;

    /// The content id of the policy's published code.
    fn ipfs_cid(&self) -> &str;

    /// A cheap early check run immediately before `evaluate`. A failure here
    /// denies the action with the failure recorded as a runtime error.
    async fn precheck(&self, _params: &PolicyParams) -> Result<(), PolicyRuntimeError> {
        Ok(())
    }

    /// Evaluates the action against this policy.
    async fn evaluate(&self, params: &PolicyParams) -> PolicyVerdict;

    /// Whether this policy declared a commit step.
    fn supports_commit(&self) -> bool {
        false
    }

    /// Records this policy's side effects after a successful execution.
    /// Only called when [`supports_commit`](Self::supports_commit) is true.
    async fn commit(
        &self,
        _params: &PolicyParams,
        _allow_result: &Value,
    ) -> Result<Value, PolicyRuntimeError> {
        Err(PolicyRuntimeError::from("policy declared no commit step"))
    }
}

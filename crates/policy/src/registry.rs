//! The policy registry: setup-time validation and ordered evaluation.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    AllowedPolicies, CommitOutcome, DeniedPolicy, Policy, PolicyEvaluationResult, PolicyParams,
    PolicyVerdict, RegistryError,
};

/// An ordered set of policies with unique package names and content ids.
pub struct PolicyRegistry {
    policies: Vec<Arc<dyn Policy>>,
}

impl std::fmt::Debug for PolicyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyRegistry").field("len", &self.policies.len()).finish()
    }
}

impl PolicyRegistry {
    /// Builds a registry, rejecting duplicate package names or content ids.
    ///
    /// Both identifiers key results downstream, so a duplicate would make
    /// one policy's results shadow another's.
    pub fn new(policies: Vec<Arc<dyn Policy>>) -> Result<Self, RegistryError> {
        let mut names = BTreeSet::new();
        let mut cids = BTreeSet::new();
        for policy in &policies {
            if !names.insert(policy.package_name().to_string()) {
                return Err(RegistryError::DuplicatePackageName(
                    policy.package_name().to_string(),
                ));
            }
            if !cids.insert(policy.ipfs_cid().to_string()) {
                return Err(RegistryError::DuplicateContentId(policy.ipfs_cid().to_string()));
            }
        }
        Ok(Self { policies })
    }

    /// The number of registered policies.
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Whether the registry is empty. An empty registry allows everything.
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Runs every policy in declared order, stopping at the first denial.
    ///
    /// A policy whose `precheck` or `evaluate` reports a runtime failure
    /// denies the action with the failure recorded; later policies are not
    /// evaluated.
    pub async fn evaluate_all(&self, params: &PolicyParams) -> PolicyEvaluationResult {
        let mut allowed_policies = AllowedPolicies::default();
        let mut evaluated_policies = Vec::with_capacity(self.policies.len());

        for policy in &self.policies {
            let package_name = policy.package_name().to_string();
            evaluated_policies.push(package_name.clone());

            if let Err(e) = policy.precheck(params).await {
                warn!(policy = %package_name, error = %e, "policy precheck failed");
                return PolicyEvaluationResult::Deny {
                    denied_policy: DeniedPolicy {
                        package_name,
                        result: serde_json::Value::Null,
                        runtime_error: Some(e.0),
                    },
                    allowed_policies,
                    evaluated_policies,
                };
            }

            match policy.evaluate(params).await {
                PolicyVerdict::Allow(result) => {
                    debug!(policy = %package_name, "policy allowed");
                    allowed_policies.insert(package_name, result);
                }
                PolicyVerdict::Deny { result, runtime_error } => {
                    debug!(policy = %package_name, "policy denied");
                    return PolicyEvaluationResult::Deny {
                        denied_policy: DeniedPolicy { package_name, result, runtime_error },
                        allowed_policies,
                        evaluated_policies,
                    };
                }
            }
        }

        PolicyEvaluationResult::Allow { allowed_policies, evaluated_policies }
    }

    /// Runs the commit step of every allowed policy that declared one, in
    /// declared order.
    ///
    /// Only reachable with the [`AllowedPolicies`] handle from an allow
    /// outcome. Commit failures are reported per policy and never revoke
    /// the already-granted allow.
    pub async fn commit_all(
        &self,
        allowed: &AllowedPolicies,
        params: &PolicyParams,
    ) -> Vec<CommitOutcome> {
        let mut outcomes = Vec::new();

        for policy in &self.policies {
            let package_name = policy.package_name();
            let Some(allow_result) = allowed.raw(package_name) else {
                continue;
            };

            if !policy.supports_commit() {
                outcomes.push(CommitOutcome::Skipped { package_name: package_name.to_string() });
                continue;
            }

            match policy.commit(params, allow_result).await {
                Ok(result) => {
                    debug!(policy = %package_name, "policy committed");
                    outcomes.push(CommitOutcome::Committed {
                        package_name: package_name.to_string(),
                        result,
                    });
                }
                Err(e) => {
                    warn!(policy = %package_name, error = %e, "policy commit failed");
                    outcomes.push(CommitOutcome::Failed {
                        package_name: package_name.to_string(),
                        error: e.0,
                    });
                }
            }
        }

        outcomes
    }
}

//! Aggregate evaluation results.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};
use serde_json::Value;

/// The policy that stopped an evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeniedPolicy {
    /// The denying policy's package name.
    pub package_name: String,
    /// The policy's typed deny-result.
    pub result: Value,
    /// Set when the denial came from a runtime or schema failure.
    pub runtime_error: Option<String>,
}

impl Serialize for DeniedPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DeniedPolicy", 3)?;
        state.serialize_field("packageName", &self.package_name)?;
        state.serialize_field("result", &self.result)?;
        if let Some(error) = &self.runtime_error {
            state.serialize_field("runtimeError", error)?;
        } else {
            state.skip_field("runtimeError")?;
        }
        state.end()
    }
}

/// The allow-results of every policy that allowed, keyed by package name.
///
/// Also the capability that unlocks the commit phase: the only way to get
/// one is out of [`PolicyEvaluationResult::Allow`] (or the partial set that
/// preceded a denial, which the commit API does not accept).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedPolicies {
    results: BTreeMap<String, Value>,
}

impl AllowedPolicies {
    pub(crate) fn insert(&mut self, package_name: String, result: Value) {
        self.results.insert(package_name, result);
    }

    /// The raw allow-result recorded for a package, if it allowed.
    pub fn raw(&self, package_name: &str) -> Option<&Value> {
        self.results.get(package_name)
    }

    /// Deserializes a package's allow-result into its typed shape.
    pub fn result_of<T: DeserializeOwned>(
        &self,
        package_name: &str,
    ) -> Result<Option<T>, serde_json::Error> {
        self.results
            .get(package_name)
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
    }

    /// Whether the given package recorded an allow-result.
    pub fn contains(&self, package_name: &str) -> bool {
        self.results.contains_key(package_name)
    }

    /// The package names with recorded allow-results.
    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.results.keys().map(String::as_str)
    }

    /// The number of recorded allow-results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether no policy recorded an allow-result.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl Serialize for AllowedPolicies {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.results.len()))?;
        for (package, result) in &self.results {
            map.serialize_entry(package, result)?;
        }
        map.end()
    }
}

/// The aggregate outcome of evaluating a policy list.
///
/// Discriminated on allow: the `Allow` variant cannot carry a denial and the
/// `Deny` variant cannot omit one. `evaluated_policies` always lists every
/// policy that ran, in run order, the denying policy included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyEvaluationResult {
    /// Every policy allowed.
    Allow {
        /// Per-policy allow-results, keyed by package name.
        allowed_policies: AllowedPolicies,
        /// Every policy that ran, in order.
        evaluated_policies: Vec<String>,
    },
    /// A policy denied; later policies never ran.
    Deny {
        /// The denying policy.
        denied_policy: DeniedPolicy,
        /// Allow-results of the policies that ran before the denial.
        allowed_policies: AllowedPolicies,
        /// Every policy that ran, in order, the denying one last.
        evaluated_policies: Vec<String>,
    },
}

impl PolicyEvaluationResult {
    /// Whether every policy allowed.
    pub const fn allowed(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }

    /// Every policy that ran, in run order.
    pub fn evaluated_policies(&self) -> &[String] {
        match self {
            Self::Allow { evaluated_policies, .. } | Self::Deny { evaluated_policies, .. } => {
                evaluated_policies
            }
        }
    }

    /// The denying policy, if the evaluation was denied.
    pub fn denied_policy(&self) -> Option<&DeniedPolicy> {
        match self {
            Self::Allow { .. } => None,
            Self::Deny { denied_policy, .. } => Some(denied_policy),
        }
    }
}

impl Serialize for PolicyEvaluationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Allow { allowed_policies, evaluated_policies } => {
                let mut state = serializer.serialize_struct("PolicyEvaluationResult", 3)?;
                state.serialize_field("allow", &true)?;
                state.serialize_field("allowedPolicies", allowed_policies)?;
                state.serialize_field("evaluatedPolicies", evaluated_policies)?;
                state.end()
            }
            Self::Deny { denied_policy, allowed_policies, evaluated_policies } => {
                let mut state = serializer.serialize_struct("PolicyEvaluationResult", 4)?;
                state.serialize_field("allow", &false)?;
                state.serialize_field("deniedPolicy", denied_policy)?;
                state.serialize_field("allowedPolicies", allowed_policies)?;
                state.serialize_field("evaluatedPolicies", evaluated_policies)?;
                state.end()
            }
        }
    }
}

/// The outcome of one policy's commit step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The policy committed its side effects.
    Committed {
        /// The committing policy's package name.
        package_name: String,
        /// The policy's commit result.
        result: Value,
    },
    /// The policy's commit step failed. Does not revoke the allow.
    Failed {
        /// The failing policy's package name.
        package_name: String,
        /// The commit failure.
        error: String,
    },
    /// The policy declared no commit step.
    Skipped {
        /// The policy's package name.
        package_name: String,
    },
}

impl CommitOutcome {
    /// The package name this outcome belongs to.
    pub fn package_name(&self) -> &str {
        match self {
            Self::Committed { package_name, .. }
            | Self::Failed { package_name, .. }
            | Self::Skipped { package_name } => package_name,
        }
    }
}

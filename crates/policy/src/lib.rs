//! Policy registration and aggregate evaluation.
//!
//! A policy is an independently pluggable authorization check identified by
//! a package name and a content id. The registry runs policies in their
//! declared order, stops at the first denial, and folds the per-policy
//! results into one allow-discriminated [`PolicyEvaluationResult`]. The type
//! is built so the invalid combinations ("allowed but with a denied policy",
//! "denied but nothing denied") cannot be constructed, and so the commit
//! phase is only reachable from an allow outcome.

pub mod error;
pub use error::{PolicyRuntimeError, RegistryError};

pub mod lookup;
pub use lookup::{PermittedPolicy, PolicyLookup};

pub mod policy;
pub use policy::{Policy, PolicyParams, PolicyVerdict};

pub mod registry;
pub use registry::PolicyRegistry;

pub mod result;
pub use result::{AllowedPolicies, CommitOutcome, DeniedPolicy, PolicyEvaluationResult};

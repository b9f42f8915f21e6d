//! Wire-shaped responses for the two pipeline entry points.
//!
//! Both entry points always resolve with a discriminated success/failure
//! object; the failure side carries a single human-readable runtime error.
//! The enums keep the invalid combinations (a failure with a result, a
//! success with an error) unrepresentable, and serialize manually into the
//! `{"success": ..., ...}` wire shape.

use alloy_primitives::Bytes;
use opguard_primitives::{AssetChange, UserOperation};
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// The successful payload of a precheck run.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecheckData {
    /// The asset changes the operation would cause.
    pub simulation_changes: Vec<AssetChange>,
}

/// The outcome of a precheck run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrecheckOutcome {
    /// Every check passed; nothing was signed.
    Success(PrecheckData),
    /// A stage aborted.
    Failure {
        /// The aborting stage's message.
        runtime_error: String,
    },
}

impl PrecheckOutcome {
    /// Whether the precheck passed.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The simulation changes, when the precheck passed.
    pub fn simulation_changes(&self) -> Option<&[AssetChange]> {
        match self {
            Self::Success(data) => Some(&data.simulation_changes),
            Self::Failure { .. } => None,
        }
    }

    /// The runtime error, when the precheck failed.
    pub fn runtime_error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { runtime_error } => Some(runtime_error),
        }
    }
}

impl Serialize for PrecheckOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success(data) => {
                let mut state = serializer.serialize_struct("PrecheckOutcome", 2)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("result", data)?;
                state.end()
            }
            Self::Failure { runtime_error } => {
                let mut state = serializer.serialize_struct("PrecheckOutcome", 2)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("runtimeError", runtime_error)?;
                state.end()
            }
        }
    }
}

/// The successful payload of an execute run.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteData {
    /// The canonical signature produced by the signer adapter.
    pub signature: Bytes,
    /// The asset changes the operation would cause. Identical to what a
    /// precheck of the same operation reports.
    pub simulation_changes: Vec<AssetChange>,
    /// The user operation with its signature filled in, when a user
    /// operation was signed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_operation: Option<UserOperation>,
    /// The broadcast-ready signed transaction, when a plain transaction was
    /// signed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_transaction: Option<Bytes>,
}

/// The outcome of an execute run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecuteOutcome {
    /// Every check passed and the operation was signed.
    Success(ExecuteData),
    /// A stage aborted. No signature was produced.
    Failure {
        /// The aborting stage's message.
        runtime_error: String,
    },
}

impl ExecuteOutcome {
    /// Whether the execution succeeded.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The signed payload, when the execution succeeded.
    pub fn result(&self) -> Option<&ExecuteData> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// The runtime error, when the execution failed.
    pub fn runtime_error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { runtime_error } => Some(runtime_error),
        }
    }
}

impl Serialize for ExecuteOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success(data) => {
                let mut state = serializer.serialize_struct("ExecuteOutcome", 2)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("result", data)?;
                state.end()
            }
            Self::Failure { runtime_error } => {
                let mut state = serializer.serialize_struct("ExecuteOutcome", 2)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("runtimeError", runtime_error)?;
                state.end()
            }
        }
    }
}

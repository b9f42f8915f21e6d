//! Error types for the pipeline.

use alloy_primitives::Address;
use opguard_decode::DecodeError;
use opguard_eip712::ReferenceResolutionError;
use opguard_primitives::SimulationFailure;
use opguard_primitives::entry_points::UnknownEntryPointAddress;
use opguard_signer::SigningError;
use thiserror::Error;

/// A caller-supplied business rule rejected the operation.
///
/// This is a fatal outcome for the request, not a bug: the operation was
/// well-formed, the rules just said no.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A per-call predicate rejected one of the decoded calls.
    #[error("call {index} rejected: {reason}")]
    CallRejected {
        /// The rejected call's position in execution order.
        index: usize,
        /// The rule's reason.
        reason: String,
    },

    /// The simulation predicate rejected the asset-change list.
    #[error("simulation rejected: {reason}")]
    SimulationRejected {
        /// The rule's reason.
        reason: String,
    },
}

impl ValidationError {
    /// A per-call rejection.
    pub fn call(index: usize, reason: impl Into<String>) -> Self {
        Self::CallRejected { index, reason: reason.into() }
    }

    /// A simulation rejection.
    pub fn simulation(reason: impl Into<String>) -> Self {
        Self::SimulationRejected { reason: reason.into() }
    }
}

/// The external simulator reported a failure.
///
/// The revert reason is carried verbatim: it is the one piece of context a
/// caller can act on, and it must never be suppressed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// The simulated execution reverted.
    #[error("simulation failed: {message}, revert reason: {revert_reason}")]
    Reverted {
        /// The simulator's error message.
        message: String,
        /// The revert reason, verbatim.
        revert_reason: String,
    },

    /// The simulator failed without a revert reason.
    #[error("simulation failed: {message}")]
    Failed {
        /// The simulator's error message.
        message: String,
    },
}

impl From<SimulationFailure> for SimulationError {
    fn from(failure: SimulationFailure) -> Self {
        match failure.revert_reason {
            Some(revert_reason) => Self::Reverted { message: failure.message, revert_reason },
            None => Self::Failed { message: failure.message },
        }
    }
}

/// Any failure a pipeline stage can abort with.
///
/// Callers never see this type directly: `precheck`/`execute` catch it at
/// the boundary and fold it into a structured failure response.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The operation's call data could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A caller-supplied rule rejected the operation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The external simulator reported a failure.
    #[error(transparent)]
    Simulation(#[from] SimulationError),

    /// The remote signer produced unusable output.
    #[error(transparent)]
    Signing(#[from] SigningError),

    /// A signing template contained an unresolvable reference.
    #[error(transparent)]
    Reference(#[from] ReferenceResolutionError),

    /// The configured entry point matches no supported version.
    #[error(transparent)]
    UnknownEntryPoint(#[from] UnknownEntryPointAddress),

    /// The chain RPC provider failed.
    #[error("provider error: {0}")]
    Provider(String),

    /// A user operation arrived without an account configuration.
    #[error("user operations require an account configuration")]
    MissingAccountConfig,

    /// The account's signing convention names a validator module that is not
    /// installed on-chain.
    #[error("validator module {module} is not installed on account {account}")]
    ModuleNotInstalled {
        /// The smart account probed.
        account: Address,
        /// The module the signing convention expected.
        module: Address,
    },
}

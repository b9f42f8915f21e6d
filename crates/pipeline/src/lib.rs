//! The validate/simulate/sign pipeline.
//!
//! One request flows through one sequential chain:
//!
//! ```text
//! Decode -> PerCallValidate -> Simulate -> SimulationValidate -> [Sign] -> Done
//! ```
//!
//! `precheck` stops before the sign stage; `execute` runs the full chain.
//! Both return the same simulation-changes payload on success so callers can
//! render identical previews before and after signing, and both convert
//! every stage failure into a structured failure result at the boundary —
//! neither ever panics past it or returns `Err`. Dropping an in-flight
//! future cancels the request at its current suspension point; a signature
//! only exists once `execute` has resolved successfully.

pub mod config;
pub use config::{AccountConfig, OperationParams, SigningConvention};

pub mod error;
pub use error::{PipelineError, SimulationError, ValidationError};

pub mod pipeline;
pub use pipeline::GuardPipeline;

pub mod provider;
pub use provider::ChainRpcProvider;

pub mod response;
pub use response::{ExecuteData, ExecuteOutcome, PrecheckData, PrecheckOutcome};

pub mod validator;
pub use validator::{AllowAll, CallView, OperationValidator};

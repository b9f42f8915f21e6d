//! Error types for policy registration and execution.

use thiserror::Error;

/// Errors raised while assembling a policy registry.
///
/// Both package names and content ids key per-policy results, so either
/// colliding would make results unaddressable. Rejected at setup, before any
/// evaluation can run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two policies declared the same package name.
    #[error("duplicate policy package name `{0}`")]
    DuplicatePackageName(String),

    /// Two policies declared the same content id.
    #[error("duplicate policy content id `{0}`")]
    DuplicateContentId(String),
}

/// A runtime failure inside a policy's own code (not a deny verdict).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct PolicyRuntimeError(pub String);

impl From<String> for PolicyRuntimeError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for PolicyRuntimeError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

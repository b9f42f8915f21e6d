//! Error types for signing.

use thiserror::Error;

/// Errors that can occur while producing a signature.
///
/// A signing failure never yields a fabricated signature: every variant
/// aborts the request that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningError {
    /// The remote signer's response was missing `r`, `s` or the recovery id.
    #[error("Signed tx missing signature fields")]
    MissingSignatureFields,

    /// A signature component was present but structurally invalid.
    #[error("malformed signature component `{component}`: {message}")]
    MalformedComponent {
        /// Which component was malformed.
        component: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// The delegated public key could not be parsed into an address.
    #[error("invalid signer public key: {0}")]
    InvalidPublicKey(String),

    /// The remote signer itself failed (transport, key lookup, quorum).
    #[error("remote signer failed: {0}")]
    Remote(String),

    /// The typed-data payload could not be hashed.
    #[error("typed-data hashing failed: {0}")]
    TypedData(String),
}

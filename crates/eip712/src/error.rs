//! Error types for template resolution.

use thiserror::Error;

/// Errors raised while resolving a signing template.
///
/// Every variant is a configuration bug in the template or its context, not
/// a runtime condition: nothing here is retried, and no partially resolved
/// template is ever signed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceResolutionError {
    /// A string leaf carried the reference sigil but named no known
    /// reference.
    #[error("unknown template reference `{reference}`")]
    UnknownReference {
        /// The offending reference string, verbatim.
        reference: String,
    },

    /// A known reference was used in a context that cannot supply its value
    /// (e.g. `$validUntil` without a validity window).
    #[error("template reference `{reference}` has no value in this signing context")]
    MissingContext {
        /// The reference that could not be resolved.
        reference: &'static str,
    },

    /// The fully resolved template did not assemble into valid typed data.
    #[error("resolved template is not valid EIP-712 typed data: {message}")]
    InvalidTypedData {
        /// The typed-data parser's message.
        message: String,
    },
}

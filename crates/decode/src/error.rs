//! Error types for call-data decoding.

use thiserror::Error;

/// Errors that can occur while decoding account call data.
///
/// All of these are fatal for the request that produced them; nothing in
/// this module is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// No known shape of any supported standard matched the call data.
    #[error("unsupported call-data shape")]
    UnsupportedShape,

    /// More than one standard's decoder claimed the same call data.
    #[error("ambiguous decoding, multiple standards matched")]
    AmbiguousStandards,

    /// The call data requested a delegate-call execution mode. Delegate
    /// calls run arbitrary code in the account's own storage context, so
    /// they are rejected outright rather than decoded.
    #[error("delegate-call execution mode is blocked")]
    DelegateCallBlocked,

    /// The call data requested an execution mode outside the known set.
    #[error("unknown execution mode {call_type:#04x}")]
    UnknownExecutionMode {
        /// The call-type byte found in the mode word.
        call_type: u8,
    },

    /// A shape matched its selector but the payload failed to decode.
    #[error("malformed {standard} payload: {message}")]
    MalformedPayload {
        /// The standard whose shape matched.
        standard: &'static str,
        /// What went wrong structurally.
        message: String,
    },
}

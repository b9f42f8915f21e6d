//! The remote threshold-signer capability.

use alloy_primitives::{B256, Bytes};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::SigningError;

/// The provider-native signature shape returned by the remote signer.
///
/// Every field is independently optional because the remote end reports them
/// as separate values; the adapter refuses to assemble a signature unless all
/// three are present and well-formed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSignature {
    /// The signature's `r` scalar, big-endian.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<Bytes>,
    /// The signature's `s` scalar, big-endian.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<Bytes>,
    /// The recovery id (0 or 1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_id: Option<u8>,
}

/// A remote signing capability keyed by a public key.
///
/// Implementations talk to the threshold-signing runtime; this core treats
/// them as a single opaque dependency and does no pooling or rate limiting.
#[async_trait]
pub trait RemoteSigner: Send + Sync {
    /// Signs the raw 32-byte digest with the key identified by
    /// `public_key` (hex, uncompressed).
    async fn sign(&self, digest: B256, public_key: &str) -> Result<RemoteSignature, SigningError>;
}

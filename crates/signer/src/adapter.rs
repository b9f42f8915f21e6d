//! The per-request signer capability.

use std::sync::Arc;

use alloy_consensus::{SignableTransaction, TxEip1559, TxLegacy};
use alloy_dyn_abi::TypedData;
use alloy_eips::eip2718::Encodable2718;
use alloy_primitives::{Address, B256, Bytes, TxKind, U256, eip191_hash_message, hex, keccak256};
use opguard_primitives::Transaction;
use tracing::debug;

use crate::{RemoteSignature, RemoteSigner, SigningError};

/// A normalized ECDSA signature assembled from a remote signer response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcdsaSignature {
    /// The `r` scalar.
    pub r: U256,
    /// The `s` scalar.
    pub s: U256,
    /// The recovery id (0 or 1).
    pub recovery_id: u8,
}

impl EcdsaSignature {
    /// Validates and assembles the provider-native shape. Missing fields are
    /// a hard error; zero bytes are never substituted.
    pub fn from_remote(raw: RemoteSignature) -> Result<Self, SigningError> {
        let (Some(r), Some(s), Some(recovery_id)) = (raw.r, raw.s, raw.recovery_id) else {
            return Err(SigningError::MissingSignatureFields);
        };
        if r.is_empty() || s.is_empty() {
            return Err(SigningError::MissingSignatureFields);
        }
        if r.len() > 32 {
            return Err(SigningError::MalformedComponent {
                component: "r",
                message: format!("{} bytes, expected at most 32", r.len()),
            });
        }
        if s.len() > 32 {
            return Err(SigningError::MalformedComponent {
                component: "s",
                message: format!("{} bytes, expected at most 32", s.len()),
            });
        }
        if recovery_id > 1 {
            return Err(SigningError::MalformedComponent {
                component: "recoveryId",
                message: format!("{recovery_id}, expected 0 or 1"),
            });
        }

        Ok(Self {
            r: U256::from_be_slice(&r),
            s: U256::from_be_slice(&s),
            recovery_id,
        })
    }

    /// The recovery indicator in the 27/28 convention.
    pub const fn v(&self) -> u8 {
        27 + self.recovery_id
    }

    /// The recovery indicator in the legacy transaction convention:
    /// EIP-155 (`35 + 2·chainId + recoveryId`) when a chain id is bound,
    /// pre-EIP-155 (`27 + recoveryId`) otherwise.
    pub const fn legacy_v(&self, chain_id: Option<u64>) -> u64 {
        match chain_id {
            Some(id) => 35 + 2 * id + self.recovery_id as u64,
            None => 27 + self.recovery_id as u64,
        }
    }

    /// The canonical 65-byte encoding: `r (32) || s (32) || v (1)`.
    pub fn as_bytes(&self) -> Bytes {
        let mut out = Vec::with_capacity(65);
        out.extend_from_slice(&self.r.to_be_bytes::<32>());
        out.extend_from_slice(&self.s.to_be_bytes::<32>());
        out.push(self.v());
        out.into()
    }

    fn to_alloy(self) -> alloy_primitives::Signature {
        alloy_primitives::Signature::new(self.r, self.s, self.recovery_id == 1)
    }
}

/// A transaction signed by the remote signer, re-serialized with its final
/// signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// The EIP-2718 encoded signed transaction, ready for broadcast.
    pub raw: Bytes,
    /// The signed transaction's hash.
    pub hash: B256,
    /// The signature that was applied.
    pub signature: EcdsaSignature,
}

/// A signing capability for one delegated key.
///
/// Constructed per request from the delegated public key and an injected
/// [`RemoteSigner`]; holds no key material and no mutable state.
#[derive(Clone)]
pub struct DelegatedSigner {
    public_key: String,
    address: Address,
    remote: Arc<dyn RemoteSigner>,
}

impl std::fmt::Debug for DelegatedSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelegatedSigner").field("address", &self.address).finish_non_exhaustive()
    }
}

impl DelegatedSigner {
    /// Builds a signer for the given uncompressed secp256k1 public key
    /// (hex, with or without the `0x`/`04` prefixes).
    pub fn new(public_key: &str, remote: Arc<dyn RemoteSigner>) -> Result<Self, SigningError> {
        let address = address_from_public_key(public_key)?;
        Ok(Self { public_key: public_key.to_string(), address, remote })
    }

    /// The address derived from the delegated public key.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The delegated public key, as configured.
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Signs a raw 32-byte digest.
    pub async fn sign_hash(&self, digest: B256) -> Result<EcdsaSignature, SigningError> {
        debug!(signer = %self.address, %digest, "requesting remote signature");
        let raw = self.remote.sign(digest, &self.public_key).await?;
        EcdsaSignature::from_remote(raw)
    }

    /// Signs a message with personal-sign semantics: the EIP-191 prefix is
    /// applied, the result hashed, and the hash signed.
    pub async fn sign_message(&self, message: &[u8]) -> Result<EcdsaSignature, SigningError> {
        self.sign_hash(eip191_hash_message(message)).await
    }

    /// Hashes the typed data per EIP-712 and signs the digest.
    pub async fn sign_typed_data(&self, typed: &TypedData) -> Result<EcdsaSignature, SigningError> {
        let digest = typed
            .eip712_signing_hash()
            .map_err(|e| SigningError::TypedData(e.to_string()))?;
        self.sign_hash(digest).await
    }

    /// Serializes the transaction with a signature placeholder, hashes it,
    /// signs the hash, and re-serializes with the final signature.
    pub async fn sign_transaction(
        &self,
        tx: &Transaction,
    ) -> Result<SignedTransaction, SigningError> {
        if tx.is_eip1559() {
            let unsigned = TxEip1559 {
                chain_id: tx.chain_id,
                nonce: tx.nonce,
                gas_limit: tx.gas_limit,
                max_fee_per_gas: tx.max_fee_per_gas.unwrap_or_default(),
                max_priority_fee_per_gas: tx.max_priority_fee_per_gas.unwrap_or_default(),
                to: TxKind::Call(tx.to),
                value: tx.value,
                access_list: Default::default(),
                input: tx.input.clone(),
            };
            let signature = self.sign_hash(unsigned.signature_hash()).await?;
            let signed = unsigned.into_signed(signature.to_alloy());
            Ok(SignedTransaction {
                hash: *signed.hash(),
                raw: signed.encoded_2718().into(),
                signature,
            })
        } else {
            let unsigned = TxLegacy {
                chain_id: Some(tx.chain_id),
                nonce: tx.nonce,
                gas_price: tx.gas_price.unwrap_or_default(),
                gas_limit: tx.gas_limit,
                to: TxKind::Call(tx.to),
                value: tx.value,
                input: tx.input.clone(),
            };
            let signature = self.sign_hash(unsigned.signature_hash()).await?;
            let signed = unsigned.into_signed(signature.to_alloy());
            Ok(SignedTransaction {
                hash: *signed.hash(),
                raw: signed.encoded_2718().into(),
                signature,
            })
        }
    }
}

fn address_from_public_key(public_key: &str) -> Result<Address, SigningError> {
    let stripped = public_key.strip_prefix("0x").unwrap_or(public_key);
    let bytes = hex::decode(stripped)
        .map_err(|e| SigningError::InvalidPublicKey(e.to_string()))?;

    let coordinates = match bytes.len() {
        65 if bytes[0] == 0x04 => &bytes[1..],
        64 => &bytes[..],
        other => {
            return Err(SigningError::InvalidPublicKey(format!(
                "{other} bytes, expected a 64- or 65-byte uncompressed key"
            )));
        }
    };

    Ok(Address::from_slice(&keccak256(coordinates)[12..]))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    /// A remote signer that replays a canned response.
    struct CannedSigner(RemoteSignature);

    #[async_trait]
    impl RemoteSigner for CannedSigner {
        async fn sign(&self, _digest: B256, _public_key: &str) -> Result<RemoteSignature, SigningError> {
            Ok(self.0.clone())
        }
    }

    // An uncompressed secp256k1 point; only its shape matters here.
    const PUBLIC_KEY: &str = "0x04e68acfc0253a10620dff706b0a1b1f1f5833ea3beb3bde2250d5f271f3563606672ebc45e0b7ea2e816ecb70ca03137b1c9476eec63d4632e990020b7b6fba39";

    fn canned() -> RemoteSignature {
        RemoteSignature {
            r: Some(Bytes::from(vec![0x11; 32])),
            s: Some(Bytes::from(vec![0x22; 32])),
            recovery_id: Some(1),
        }
    }

    fn signer(response: RemoteSignature) -> DelegatedSigner {
        DelegatedSigner::new(PUBLIC_KEY, Arc::new(CannedSigner(response))).unwrap()
    }

    #[test]
    fn canonical_encoding_is_r_s_v() {
        let sig = EcdsaSignature::from_remote(canned()).unwrap();
        let bytes = sig.as_bytes();
        assert_eq!(bytes.len(), 65);
        assert_eq!(&bytes[..32], &[0x11; 32]);
        assert_eq!(&bytes[32..64], &[0x22; 32]);
        assert_eq!(bytes[64], 28);
    }

    #[test]
    fn short_scalars_are_left_padded() {
        let sig = EcdsaSignature::from_remote(RemoteSignature {
            r: Some(Bytes::from(vec![0x01])),
            s: Some(Bytes::from(vec![0x02, 0x03])),
            recovery_id: Some(0),
        })
        .unwrap();

        let bytes = sig.as_bytes();
        assert_eq!(bytes[31], 0x01);
        assert!(bytes[..31].iter().all(|b| *b == 0));
        assert_eq!(&bytes[62..64], &[0x02, 0x03]);
        assert_eq!(bytes[64], 27);
    }

    #[test]
    fn missing_s_is_rejected_loudly() {
        let err = EcdsaSignature::from_remote(RemoteSignature {
            r: Some(Bytes::from(vec![0x01])),
            s: None,
            recovery_id: Some(0),
        })
        .unwrap_err();

        assert_eq!(err, SigningError::MissingSignatureFields);
        assert_eq!(err.to_string(), "Signed tx missing signature fields");
    }

    #[test]
    fn missing_recovery_id_is_rejected() {
        let err = EcdsaSignature::from_remote(RemoteSignature {
            r: Some(Bytes::from(vec![0x01; 32])),
            s: Some(Bytes::from(vec![0x02; 32])),
            recovery_id: None,
        })
        .unwrap_err();
        assert_eq!(err, SigningError::MissingSignatureFields);
    }

    #[test]
    fn oversized_r_is_malformed() {
        let err = EcdsaSignature::from_remote(RemoteSignature {
            r: Some(Bytes::from(vec![0x01; 33])),
            s: Some(Bytes::from(vec![0x02; 32])),
            recovery_id: Some(0),
        })
        .unwrap_err();
        assert!(matches!(err, SigningError::MalformedComponent { component: "r", .. }));
    }

    #[test]
    fn legacy_v_offsets_recovery_id() {
        let sig = EcdsaSignature { r: U256::from(1), s: U256::from(2), recovery_id: 1 };
        assert_eq!(sig.legacy_v(None), 28);
        assert_eq!(sig.legacy_v(Some(1)), 38);
        assert_eq!(sig.legacy_v(Some(8453)), 35 + 2 * 8453 + 1);
    }

    #[test]
    fn address_derivation_requires_uncompressed_key() {
        let err = address_from_public_key("0x02deadbeef").unwrap_err();
        assert!(matches!(err, SigningError::InvalidPublicKey(_)));

        let address = address_from_public_key(PUBLIC_KEY).unwrap();
        assert_ne!(address, Address::ZERO);
    }

    #[tokio::test]
    async fn sign_transaction_reserializes_with_the_signature() {
        let tx = Transaction {
            from: Address::repeat_byte(0x11),
            to: Address::repeat_byte(0x22),
            value: U256::from(1),
            input: Bytes::new(),
            nonce: 0,
            chain_id: 8453,
            gas_limit: 21_000,
            max_fee_per_gas: Some(1_000_000_000),
            max_priority_fee_per_gas: Some(1_000_000_000),
            gas_price: None,
        };

        let signed = signer(canned()).sign_transaction(&tx).await.unwrap();
        assert!(!signed.raw.is_empty());
        // EIP-2718 type byte for EIP-1559.
        assert_eq!(signed.raw[0], 0x02);
        assert_eq!(signed.signature.as_bytes().len(), 65);
    }

    #[tokio::test]
    async fn sign_transaction_picks_legacy_without_fee_fields() {
        let tx = Transaction {
            from: Address::repeat_byte(0x11),
            to: Address::repeat_byte(0x22),
            value: U256::ZERO,
            input: Bytes::new(),
            nonce: 7,
            chain_id: 1,
            gas_limit: 21_000,
            max_fee_per_gas: None,
            max_priority_fee_per_gas: None,
            gas_price: Some(20_000_000_000),
        };

        let signed = signer(canned()).sign_transaction(&tx).await.unwrap();
        // Legacy transactions are untyped RLP: first byte is a list prefix.
        assert!(signed.raw[0] >= 0xc0);
    }

    #[tokio::test]
    async fn incomplete_remote_response_aborts_transaction_signing() {
        let tx = Transaction {
            from: Address::repeat_byte(0x11),
            to: Address::repeat_byte(0x22),
            value: U256::ZERO,
            input: Bytes::new(),
            nonce: 0,
            chain_id: 8453,
            gas_limit: 21_000,
            max_fee_per_gas: Some(1_000_000_000),
            max_priority_fee_per_gas: Some(1_000_000_000),
            gas_price: None,
        };

        let incomplete = RemoteSignature {
            r: Some(Bytes::from(vec![0x01])),
            s: None,
            recovery_id: None,
        };
        let err = signer(incomplete).sign_transaction(&tx).await.unwrap_err();
        assert_eq!(err, SigningError::MissingSignatureFields);
    }
}

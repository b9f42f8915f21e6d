//! The signer adapter: wraps a delegated public key and a remote threshold
//! signer into a capability that signs hashes, messages, transactions and
//! typed data, normalizing the provider-native signature shape into the
//! canonical `r || s || v` encoding.
//!
//! This crate never sees a private key. The actual ECDSA operation happens
//! behind the [`RemoteSigner`] trait; everything here is encoding discipline
//! around it.

pub mod error;
pub use error::SigningError;

pub mod remote;
pub use remote::{RemoteSignature, RemoteSigner};

pub mod adapter;
pub use adapter::{DelegatedSigner, EcdsaSignature, SignedTransaction};

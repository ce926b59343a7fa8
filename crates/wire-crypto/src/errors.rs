//! # Crypto Errors

use thiserror::Error;

/// Errors from key handling and proof verification.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Bytes do not encode a valid Ed25519 public key.
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Hex-encoded key material could not be decoded.
    #[error("Invalid key encoding: {0}")]
    InvalidEncoding(String),

    /// Proof does not verify against the public key and challenge.
    #[error("Proof verification failed")]
    ProofVerificationFailed,
}

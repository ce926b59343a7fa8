//! # Node Identity
//!
//! Ed25519 keypair wrappers. The keypair is supplied out of band (from
//! configuration), is immutable for the process lifetime, and its secret
//! half is never transmitted.

use crate::challenge::{Challenge, Proof};
use crate::CryptoError;
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use zeroize::Zeroize;

/// Ed25519 public key (32 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; 32]);

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl PublicKey {
    /// Create from raw bytes, validating the curve point.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, CryptoError> {
        VerifyingKey::from_bytes(&bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self(bytes))
    }

    /// Parse from a hex string (64 hex chars).
    pub fn from_hex(encoded: &str) -> Result<Self, CryptoError> {
        let raw = hex::decode(encoded)
            .map_err(|e| CryptoError::InvalidEncoding(e.to_string()))?;
        let bytes: [u8; 32] = raw
            .try_into()
            .map_err(|_| CryptoError::InvalidEncoding("expected 32 bytes".into()))?;
        Self::from_bytes(bytes)
    }

    /// Get raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex encoding of the key.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Verify a proof over a challenge.
    pub fn verify(&self, challenge: &Challenge, proof: &Proof) -> Result<(), CryptoError> {
        let verifying_key =
            VerifyingKey::from_bytes(&self.0).map_err(|_| CryptoError::InvalidPublicKey)?;
        let sig = ed25519_dalek::Signature::from_bytes(proof.as_bytes());

        verifying_key
            .verify(challenge.as_str().as_bytes(), &sig)
            .map_err(|_| CryptoError::ProofVerificationFailed)
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// The validator's Ed25519 keypair.
pub struct NodeIdentity {
    signing_key: SigningKey,
}

impl std::fmt::Debug for NodeIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Secret material never appears in logs or panic output.
        f.debug_struct("NodeIdentity")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

impl NodeIdentity {
    /// Generate a random identity.
    #[must_use]
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create from a secret seed (32 bytes).
    #[must_use]
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&seed);
        Self { signing_key }
    }

    /// Parse the secret seed from a hex string (64 hex chars).
    pub fn from_hex(encoded: &str) -> Result<Self, CryptoError> {
        let raw = hex::decode(encoded)
            .map_err(|e| CryptoError::InvalidEncoding(e.to_string()))?;
        let seed: [u8; 32] = raw
            .try_into()
            .map_err(|_| CryptoError::InvalidEncoding("expected 32 bytes".into()))?;
        Ok(Self::from_seed(seed))
    }

    /// Get the public half.
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a challenge (deterministic, no RNG needed).
    #[must_use]
    pub fn sign(&self, challenge: &Challenge) -> Proof {
        let sig = self.signing_key.sign(challenge.as_str().as_bytes());
        Proof::from_bytes(sig.to_bytes())
    }
}

impl Drop for NodeIdentity {
    fn drop(&mut self) {
        // Zeroize secret key material
        let mut bytes = self.signing_key.to_bytes();
        bytes.zeroize();
    }
}

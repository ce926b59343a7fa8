//! # Validator Configuration
//!
//! Explicit configuration for the node, validated eagerly at construction.
//!
//! ## Fatal Conditions
//!
//! The node cannot safely validate or publish without an identity, so a
//! missing or malformed keypair is a fatal startup error: the binary logs
//! and exits nonzero before any subscription is attempted.

use rand::Rng;
use std::time::Duration;
use thiserror::Error;
use wire_crypto::{CryptoError, NodeIdentity, PublicKey};

/// Complete validator configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidatorConfig {
    /// Cluster endpoint and reconnect policy.
    pub cluster: ClusterConfig,
    /// Keypair credentials.
    pub identity: IdentityConfig,
}

impl ValidatorConfig {
    /// Load configuration from the process environment.
    ///
    /// Recognized variables: `GRAPH_SC_HOST`, `GRAPH_SC_PORT`,
    /// `GRAPH_NODE_PUB`, `GRAPH_NODE_PRIV`. Endpoint variables fall back to
    /// defaults; credential variables stay `None` when unset and fail
    /// validation instead.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("GRAPH_SC_HOST") {
            config.cluster.hostname = host;
        }
        if let Ok(port) = std::env::var("GRAPH_SC_PORT") {
            if let Ok(p) = port.parse() {
                config.cluster.port = p;
            }
        }
        config.identity.public_key_hex = std::env::var("GRAPH_NODE_PUB").ok();
        config.identity.secret_seed_hex = std::env::var("GRAPH_NODE_PRIV").ok();

        config
    }

    /// Resolve the configured credentials into a usable identity.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingCredentials`] when either half is absent
    /// - [`ConfigError::InvalidKeyMaterial`] when hex decoding or key
    ///   construction fails
    /// - [`ConfigError::KeyMismatch`] when the configured public key is not
    ///   the public half of the configured secret seed
    pub fn resolve_identity(&self) -> Result<NodeIdentity, ConfigError> {
        let (Some(public_hex), Some(secret_hex)) = (
            self.identity.public_key_hex.as_deref(),
            self.identity.secret_seed_hex.as_deref(),
        ) else {
            return Err(ConfigError::MissingCredentials);
        };

        let public_key = PublicKey::from_hex(public_hex)?;
        let identity = NodeIdentity::from_hex(secret_hex)?;

        if identity.public_key() != public_key {
            return Err(ConfigError::KeyMismatch);
        }

        Ok(identity)
    }
}

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Public or private key not supplied.
    #[error(
        "Missing GRAPH_NODE_PUB/GRAPH_NODE_PRIV credentials: \
         an unauthenticated node cannot validate or publish"
    )]
    MissingCredentials,

    /// Key material present but not decodable.
    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(#[from] CryptoError),

    /// Configured public key does not match the secret seed.
    #[error("Configured public key does not match the private key")]
    KeyMismatch,
}

/// Cluster endpoint configuration.
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// Cluster hostname.
    pub hostname: String,
    /// Cluster port.
    pub port: u16,
    /// Reconnect backoff policy.
    pub reconnect: ReconnectPolicy,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            hostname: "localhost".to_string(),
            port: 4444,
            reconnect: ReconnectPolicy::default(),
        }
    }
}

/// Keypair credentials, supplied out of band.
#[derive(Debug, Clone, Default)]
pub struct IdentityConfig {
    /// Hex-encoded Ed25519 public key (64 hex chars).
    pub public_key_hex: Option<String>,
    /// Hex-encoded Ed25519 secret seed (64 hex chars).
    pub secret_seed_hex: Option<String>,
}

/// Supervised reconnect backoff parameters.
#[derive(Debug, Clone, Copy)]
pub struct ReconnectPolicy {
    /// Delay before the first reconnect attempt, in milliseconds.
    pub initial_delay_ms: u64,
    /// Random jitter added to every delay, in milliseconds.
    pub randomness_ms: u64,
    /// Upper bound on the deterministic part of the delay, in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_delay_ms: 1,
            randomness_ms: 100,
            max_delay_ms: 500,
        }
    }
}

impl ReconnectPolicy {
    /// Backoff delay for the given attempt (1-based), with jitter.
    ///
    /// Doubles per attempt up to `max_delay_ms`, plus up to `randomness_ms`
    /// of jitter so simultaneous reconnecting nodes spread out.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(u32::from(u16::MAX));
        let base = self
            .initial_delay_ms
            .saturating_mul(1u64.checked_shl(shift).unwrap_or(u64::MAX))
            .min(self.max_delay_ms);
        let jitter = if self.randomness_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..self.randomness_ms)
        };
        Duration::from_millis(base + jitter)
    }
}

//! # Authenticator
//!
//! Challenge-response login against the cluster. A fresh challenge is built
//! from the CURRENT session identifier on every attempt, so the handshake
//! must re-run after each reconnect.
//!
//! There is no retry loop here: a rejected login leaves the node
//! unauthenticated, and the next `Connected` event re-invokes this contract.

use cluster_client::{LoginRequest, Transport, TransportError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use wire_crypto::{Challenge, NodeIdentity};

/// Errors from the authentication handshake.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The transport has no live session to authenticate against.
    #[error("Cannot authenticate: not connected")]
    NotConnected,

    /// The cluster rejected the login.
    #[error("Login rejected: {0}")]
    Rejected(String),

    /// The connection went away mid-handshake.
    #[error("Connection lost during login")]
    ConnectionLost,
}

impl From<TransportError> for AuthError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::NotConnected => Self::NotConnected,
            TransportError::LoginRejected(reason) => Self::Rejected(reason),
            TransportError::Closed => Self::ConnectionLost,
        }
    }
}

/// Performs the challenge-response handshake for a fixed identity.
pub struct Authenticator {
    identity: Arc<NodeIdentity>,
}

impl Authenticator {
    /// Create an authenticator for the node's identity.
    #[must_use]
    pub fn new(identity: Arc<NodeIdentity>) -> Self {
        Self { identity }
    }

    /// Run the handshake against the transport's current session.
    ///
    /// Builds `"{session_id}/{millis}"`, signs it, and submits the proof via
    /// the login primitive. Resolves on acknowledgement.
    pub async fn authenticate(&self, transport: &dyn Transport) -> Result<(), AuthError> {
        let session_id = transport.session_id().ok_or(AuthError::NotConnected)?;
        let challenge = Challenge::issue(&session_id);
        debug!(%session_id, challenge = %challenge, "Issuing login challenge");

        let proof = self.identity.sign(&challenge);
        transport
            .login(LoginRequest {
                public_key: self.identity.public_key(),
                challenge,
                proof,
            })
            .await?;

        info!(public_key = %self.identity.public_key(), "Logged in");
        Ok(())
    }
}

//! # Transport Trait
//!
//! The boundary between the validator and its pub/sub cluster. Everything
//! the node does on the wire goes through this trait, which keeps the core
//! testable against the in-process cluster.

use crate::connection::ConnectionEvent;
use crate::errors::TransportError;
use crate::subscription::ChannelSubscription;
use async_trait::async_trait;
use tokio::sync::broadcast;
use wire_crypto::{Challenge, Proof, PublicKey};
use wire_types::{SessionId, WireMessage};

/// Options for opening a channel subscription.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubscribeOptions {
    /// Defer delivery until the connection has authenticated.
    pub wait_for_auth: bool,
}

impl SubscribeOptions {
    /// Subscription gated on successful authentication.
    #[must_use]
    pub fn wait_for_auth() -> Self {
        Self {
            wait_for_auth: true,
        }
    }
}

/// Credentials submitted to the cluster's login primitive.
///
/// Carries the challenge alongside the proof so the verifying side can check
/// session binding and freshness without protocol-private state. The secret
/// key never appears on the wire.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    /// The node's public key.
    pub public_key: PublicKey,
    /// The challenge the proof was computed over.
    pub challenge: Challenge,
    /// Ed25519 proof over the challenge.
    pub proof: Proof,
}

/// A persistent connection to a pub/sub cluster endpoint.
///
/// Implementations own their reconnect mechanics; the node only observes
/// lifecycle events and requests a fresh connection via [`connect`].
///
/// [`connect`]: Transport::connect
#[async_trait]
pub trait Transport: Send + Sync {
    /// The current session identifier, when connected.
    fn session_id(&self) -> Option<SessionId>;

    /// Subscribe to connection lifecycle events.
    ///
    /// Events emitted before this call are not replayed; subscribe before
    /// triggering [`connect`](Transport::connect).
    fn events(&self) -> broadcast::Receiver<ConnectionEvent>;

    /// Establish (or re-establish) the connection.
    ///
    /// A fresh session identifier is assigned on every call; any prior
    /// authentication state is discarded.
    async fn connect(&self) -> Result<(), TransportError>;

    /// Submit authentication credentials for the current session.
    ///
    /// Resolves on acknowledgement; fails with the cluster-reported reason
    /// on rejection. On success, `wait_for_auth` subscriptions unblock.
    async fn login(&self, request: LoginRequest) -> Result<(), TransportError>;

    /// Open a subscription to a named channel.
    async fn subscribe(
        &self,
        channel: &str,
        options: SubscribeOptions,
    ) -> Result<ChannelSubscription, TransportError>;

    /// Publish a message to a named channel, fire-and-forget.
    ///
    /// Returns the number of subscribers that received the message; callers
    /// on the validated-output path ignore it.
    async fn publish(&self, channel: &str, message: WireMessage) -> usize;
}

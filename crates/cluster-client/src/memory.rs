//! # In-Process Cluster
//!
//! In-memory implementation of the [`Transport`] trait.
//!
//! Uses one `tokio::sync::broadcast` channel per pub/sub channel name for
//! multi-producer, multi-consumer semantics. Suitable for single-node
//! operation and the test suite; a distributed deployment would implement
//! [`Transport`] over a real cluster client instead.
//!
//! ## Login Verification
//!
//! The cluster side accepts a login when:
//! - the presented public key is in the trusted set,
//! - the challenge is bound to the current session identifier,
//! - the challenge timestamp is within the freshness window,
//! - the Ed25519 proof verifies over the challenge.

use crate::connection::ConnectionEvent;
use crate::errors::TransportError;
use crate::subscription::ChannelSubscription;
use crate::transport::{LoginRequest, SubscribeOptions, Transport};
use crate::{DEFAULT_CHANNEL_CAPACITY, DEFAULT_MAX_CHALLENGE_AGE_MILLIS};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};
use uuid::Uuid;
use wire_crypto::{unix_millis, PublicKey};
use wire_types::{SessionId, WireMessage};

/// In-memory pub/sub cluster.
///
/// Cheap to clone via internal `Arc`s; all clones observe the same cluster.
pub struct InMemoryCluster {
    /// Broadcast sender per channel name, created on first use.
    channels: RwLock<HashMap<String, broadcast::Sender<WireMessage>>>,

    /// Active subscription count by channel.
    registry: Arc<RwLock<HashMap<String, usize>>>,

    /// Current session, when connected.
    session: RwLock<Option<SessionId>>,

    /// Authentication gate for `wait_for_auth` subscriptions.
    auth_tx: watch::Sender<bool>,

    /// Lifecycle event stream.
    events_tx: broadcast::Sender<ConnectionEvent>,

    /// Public keys allowed to authenticate.
    trusted_keys: RwLock<HashSet<PublicKey>>,

    /// Freshness window for login challenges.
    max_challenge_age_millis: u128,

    /// Per-channel buffer capacity.
    capacity: usize,
}

impl InMemoryCluster {
    /// Create a new cluster with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new cluster with specified per-channel capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (auth_tx, _) = watch::channel(false);
        let (events_tx, _) = broadcast::channel(64);
        Self {
            channels: RwLock::new(HashMap::new()),
            registry: Arc::new(RwLock::new(HashMap::new())),
            session: RwLock::new(None),
            auth_tx,
            events_tx,
            trusted_keys: RwLock::new(HashSet::new()),
            max_challenge_age_millis: DEFAULT_MAX_CHALLENGE_AGE_MILLIS,
            capacity,
        }
    }

    /// Allow a public key to authenticate.
    pub fn trust(&self, key: PublicKey) {
        self.trusted_keys.write().insert(key);
    }

    /// Whether the current connection has authenticated.
    #[must_use]
    pub fn authenticated(&self) -> bool {
        *self.auth_tx.borrow()
    }

    /// Number of active subscriptions for a channel.
    #[must_use]
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.channels
            .read()
            .get(channel)
            .map_or(0, broadcast::Sender::receiver_count)
    }

    /// Drop the connection, simulating a transport-level failure.
    ///
    /// Clears the session and the authentication gate, then emits an
    /// `Error` followed by `Disconnected`.
    pub fn drop_connection(&self, reason: &str) {
        *self.session.write() = None;
        self.auth_tx.send_replace(false);
        warn!(reason, "Cluster connection dropped");
        let _ = self.events_tx.send(ConnectionEvent::Error(reason.to_string()));
        let _ = self.events_tx.send(ConnectionEvent::Disconnected);
    }

    fn sender_for(&self, channel: &str) -> broadcast::Sender<WireMessage> {
        if let Some(sender) = self.channels.read().get(channel) {
            return sender.clone();
        }
        let mut channels = self.channels.write();
        channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }

    fn verify_login(&self, request: &LoginRequest) -> Result<(), TransportError> {
        let session = self
            .session
            .read()
            .clone()
            .ok_or(TransportError::NotConnected)?;

        if !self.trusted_keys.read().contains(&request.public_key) {
            return Err(TransportError::LoginRejected("untrusted public key".into()));
        }

        if request.challenge.session_part() != Some(session.as_str()) {
            return Err(TransportError::LoginRejected(
                "challenge not bound to current session".into(),
            ));
        }

        let issued = request
            .challenge
            .timestamp_millis()
            .ok_or_else(|| TransportError::LoginRejected("malformed challenge".into()))?;
        let age = unix_millis().abs_diff(issued);
        if age > self.max_challenge_age_millis {
            return Err(TransportError::LoginRejected("stale challenge".into()));
        }

        request
            .public_key
            .verify(&request.challenge, &request.proof)
            .map_err(|_| TransportError::LoginRejected("proof verification failed".into()))
    }
}

impl Default for InMemoryCluster {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for InMemoryCluster {
    fn session_id(&self) -> Option<SessionId> {
        self.session.read().clone()
    }

    fn events(&self) -> broadcast::Receiver<ConnectionEvent> {
        self.events_tx.subscribe()
    }

    async fn connect(&self) -> Result<(), TransportError> {
        let session_id = SessionId::new(Uuid::new_v4().to_string());
        *self.session.write() = Some(session_id.clone());
        self.auth_tx.send_replace(false);
        info!(%session_id, "Cluster connection established");
        let _ = self.events_tx.send(ConnectionEvent::Connected { session_id });
        Ok(())
    }

    async fn login(&self, request: LoginRequest) -> Result<(), TransportError> {
        match self.verify_login(&request) {
            Ok(()) => {
                self.auth_tx.send_replace(true);
                info!(public_key = %request.public_key, "Login accepted");
                Ok(())
            }
            Err(err) => {
                warn!(public_key = %request.public_key, error = %err, "Login rejected");
                Err(err)
            }
        }
    }

    async fn subscribe(
        &self,
        channel: &str,
        options: SubscribeOptions,
    ) -> Result<ChannelSubscription, TransportError> {
        if self.session.read().is_none() {
            return Err(TransportError::NotConnected);
        }

        if options.wait_for_auth {
            let mut auth_rx = self.auth_tx.subscribe();
            auth_rx
                .wait_for(|authenticated| *authenticated)
                .await
                .map_err(|_| TransportError::Closed)?;
        }

        let receiver = self.sender_for(channel).subscribe();
        *self.registry.write().entry(channel.to_string()).or_insert(0) += 1;

        debug!(channel, wait_for_auth = options.wait_for_auth, "Subscription opened");

        Ok(ChannelSubscription::new(
            receiver,
            channel.to_string(),
            Arc::clone(&self.registry),
        ))
    }

    async fn publish(&self, channel: &str, message: WireMessage) -> usize {
        let sender = self.sender_for(channel);
        match sender.send(message) {
            Ok(receiver_count) => {
                debug!(channel, receivers = receiver_count, "Message published");
                receiver_count
            }
            Err(_) => {
                // No receivers - message is dropped
                debug!(channel, "Message dropped (no receivers)");
                0
            }
        }
    }
}

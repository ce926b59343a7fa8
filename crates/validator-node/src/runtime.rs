//! # Wire Validator Runtime
//!
//! Wires the authenticator, dispatcher, write queue, and publisher together
//! and supervises the connection lifecycle.
//!
//! ## Lifecycle
//!
//! ```text
//! connect ──→ Connected ──→ authenticate ──→ subscribe get/put ──→ dispatch
//!                 ↑                                                   │
//!                 │          backoff (initial=1ms, jitter, max=500ms) │
//!                 └──────────── reconnect ◄────── Error/Disconnected ─┘
//! ```
//!
//! Authentication is re-run on every `Connected` event with a challenge
//! built from the new session identifier; there is no explicit retry loop
//! anywhere else.

use crate::auth::Authenticator;
use crate::config::{ConfigError, ReconnectPolicy, ValidatorConfig};
use crate::dispatch::Dispatcher;
use crate::publish::Publisher;
use crate::queue::ValidationQueue;
use cluster_client::{ConnectionEvent, Transport, TransportError};
use std::sync::Arc;
use suppressor::Suppressor;
use tokio::sync::{broadcast, watch};
use tracing::{error, info, warn};
use wire_types::PUT_CHANNEL;

/// The validator node, fully wired.
pub struct WireValidator {
    transport: Arc<dyn Transport>,
    authenticator: Authenticator,
    queue: ValidationQueue,
    reconnect: ReconnectPolicy,
    dispatcher: Dispatcher,
}

impl std::fmt::Debug for WireValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WireValidator")
            .field("reconnect", &self.reconnect)
            .field("pending_writes", &self.queue.pending_len())
            .finish_non_exhaustive()
    }
}

impl WireValidator {
    /// Construct the node, validating configuration eagerly.
    ///
    /// Resolves the identity up front so a missing or malformed keypair
    /// fails here, before any connection or subscription is attempted.
    /// Attaches the publisher to the queue's completion stream.
    pub fn new(
        config: &ValidatorConfig,
        transport: Arc<dyn Transport>,
        engine: Arc<dyn Suppressor>,
    ) -> Result<Self, ConfigError> {
        let identity = Arc::new(config.resolve_identity()?);
        info!(public_key = %identity.public_key(), "Validator identity loaded");

        let (queue, completions) = ValidationQueue::new(Arc::clone(&engine));

        // Sole consumer of the completion stream, attached once.
        let publisher = Publisher::new(Arc::clone(&transport), PUT_CHANNEL);
        tokio::spawn(publisher.run(completions));

        let dispatcher =
            Dispatcher::new(Arc::clone(&transport), engine, queue.clone());

        Ok(Self {
            transport,
            authenticator: Authenticator::new(identity),
            queue,
            reconnect: config.cluster.reconnect,
            dispatcher,
        })
    }

    /// The shared write serialization queue (middleware extension point).
    #[must_use]
    pub fn queue(&self) -> &ValidationQueue {
        &self.queue
    }

    /// Run the supervised connection loop until the transport closes.
    ///
    /// Connects, then reacts to lifecycle events: every `Connected` re-runs
    /// the handshake and reopens the input subscriptions; every drop ends
    /// the current dispatch epoch and schedules a backoff reconnect.
    pub async fn run(&self) -> Result<(), TransportError> {
        let mut events = self.transport.events();
        self.transport.connect().await?;

        let mut attempt: u32 = 0;
        // Signals the current connection epoch's watch loops to stop.
        let mut epoch: Option<watch::Sender<bool>> = None;

        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!(lagged = count, "Missed connection events");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    info!("Transport event stream closed, shutting down");
                    return Ok(());
                }
            };

            match event {
                ConnectionEvent::Connected { session_id } => {
                    info!(%session_id, "Connected to cluster");
                    match self.authenticator.authenticate(self.transport.as_ref()).await {
                        Ok(()) => {
                            attempt = 0;
                            let (close_tx, close_rx) = watch::channel(false);
                            if let Err(err) = self.dispatcher.start(close_rx).await {
                                error!(%err, "Failed to open input subscriptions");
                                continue;
                            }
                            epoch = Some(close_tx);
                        }
                        Err(err) => {
                            // Implicitly retried on the next reconnect.
                            error!(%err, "Error logging in");
                        }
                    }
                }
                ConnectionEvent::Error(reason) => {
                    error!(%reason, "Cluster connection error");
                }
                ConnectionEvent::Disconnected => {
                    if let Some(close_tx) = epoch.take() {
                        let _ = close_tx.send(true);
                    }
                    attempt = attempt.saturating_add(1);
                    let delay = self.reconnect.delay_for(attempt);
                    warn!(attempt, delay_ms = delay.as_millis() as u64, "Reconnecting");
                    tokio::time::sleep(delay).await;
                    self.transport.connect().await?;
                }
            }
        }
    }
}

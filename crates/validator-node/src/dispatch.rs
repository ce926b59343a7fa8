//! # Subscription Dispatcher
//!
//! Subscribes to the `graph/get` and `graph/put` input channels after
//! authentication and routes each delivered message to its processing path.
//!
//! ## Routing
//!
//! - **Read path**: each get is handed directly and independently to the
//!   validation engine on its own task; reads carry no cross-message
//!   ordering requirement and may complete out of order.
//! - **Write path**: each put is appended to the write serialization queue,
//!   which preserves strict arrival order.
//!
//! Delivery before authentication cannot happen: both subscriptions are
//! opened with `wait_for_auth`, so gating lives at the transport.

use crate::publish::forward_outcome;
use crate::queue::ValidationQueue;
use cluster_client::{SubscribeOptions, Transport, TransportError};
use std::sync::Arc;
use suppressor::Suppressor;
use tokio::sync::watch;
use tracing::{debug, info};
use wire_types::{GET_CHANNEL, PUT_CHANNEL};

/// Routes input-channel deliveries for one connection epoch.
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    engine: Arc<dyn Suppressor>,
    queue: ValidationQueue,
}

impl Dispatcher {
    /// Create a dispatcher over the shared transport, engine, and queue.
    #[must_use]
    pub fn new(
        transport: Arc<dyn Transport>,
        engine: Arc<dyn Suppressor>,
        queue: ValidationQueue,
    ) -> Self {
        Self {
            transport,
            engine,
            queue,
        }
    }

    /// Open both input subscriptions and spawn their watch loops.
    ///
    /// The loops run until the `closed` signal fires (connection epoch
    /// ended) or the subscription stream closes. Must be called after
    /// authentication; the gated subscriptions would otherwise park until
    /// login completes.
    pub async fn start(&self, closed: watch::Receiver<bool>) -> Result<(), TransportError> {
        let mut gets = self
            .transport
            .subscribe(GET_CHANNEL, SubscribeOptions::wait_for_auth())
            .await?;
        let mut puts = self
            .transport
            .subscribe(PUT_CHANNEL, SubscribeOptions::wait_for_auth())
            .await?;

        info!(get = GET_CHANNEL, put = PUT_CHANNEL, "Input subscriptions open");

        let transport = Arc::clone(&self.transport);
        let engine = Arc::clone(&self.engine);
        let mut get_closed = closed.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    delivered = gets.recv() => {
                        let Some(message) = delivered else { break };
                        // Reads are unordered: validate on a detached task.
                        let transport = Arc::clone(&transport);
                        let engine = Arc::clone(&engine);
                        tokio::spawn(async move {
                            let outcome = engine.validate(&message).await;
                            forward_outcome(
                                transport.as_ref(),
                                GET_CHANNEL,
                                message,
                                outcome,
                            )
                            .await;
                        });
                    }
                    _ = get_closed.changed() => {
                        debug!(channel = GET_CHANNEL, "Watch loop closed");
                        break;
                    }
                }
            }
        });

        let queue = self.queue.clone();
        let mut put_closed = closed;
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    delivered = puts.recv() => {
                        let Some(message) = delivered else { break };
                        queue.enqueue(message);
                        queue.process();
                    }
                    _ = put_closed.changed() => {
                        debug!(channel = PUT_CHANNEL, "Watch loop closed");
                        break;
                    }
                }
            }
        });

        Ok(())
    }
}

//! # Channel Subscription
//!
//! A push-based, infinite, non-restartable stream of messages from one
//! cluster channel. Dropping the handle cleans up the cluster-side count.

use crate::errors::TransportError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::debug;
use wire_types::WireMessage;

/// A subscription handle for receiving channel messages.
///
/// When dropped, the subscription is automatically deregistered.
pub struct ChannelSubscription {
    /// The broadcast receiver for this channel.
    receiver: broadcast::Receiver<WireMessage>,

    /// The channel this subscription watches.
    channel: String,

    /// Reference to subscription tracking (for cleanup).
    registry: Arc<RwLock<HashMap<String, usize>>>,
}

impl ChannelSubscription {
    /// Create a new subscription.
    pub(crate) fn new(
        receiver: broadcast::Receiver<WireMessage>,
        channel: String,
        registry: Arc<RwLock<HashMap<String, usize>>>,
    ) -> Self {
        Self {
            receiver,
            channel,
            registry,
        }
    }

    /// Receive the next message.
    ///
    /// # Returns
    ///
    /// - `Some(message)` - The next delivered message
    /// - `None` - The channel was closed (cluster dropped)
    pub async fn recv(&mut self) -> Option<WireMessage> {
        loop {
            match self.receiver.recv().await {
                Ok(message) => return Some(message),
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(
                        channel = %self.channel,
                        lagged = count,
                        "Subscriber lagged, some messages dropped"
                    );
                    continue;
                }
            }
        }
    }

    /// Try to receive the next message without blocking.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(message))` - A message was available
    /// - `Ok(None)` - No message available (would block)
    /// - `Err(TransportError::Closed)` - The channel was closed
    pub fn try_recv(&mut self) -> Result<Option<WireMessage>, TransportError> {
        loop {
            match self.receiver.try_recv() {
                Ok(message) => return Ok(Some(message)),
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(TransportError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            }
        }
    }

    /// The channel this subscription watches.
    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }
}

impl Drop for ChannelSubscription {
    fn drop(&mut self) {
        let mut registry = self.registry.write();
        let Some(count) = registry.get_mut(&self.channel) else {
            debug!(channel = %self.channel, "Subscription dropped");
            return;
        };

        *count = count.saturating_sub(1);
        if *count == 0 {
            registry.remove(&self.channel);
        }
        debug!(channel = %self.channel, "Subscription dropped");
    }
}

//! # Publisher
//!
//! Republishes validated messages onto the derived output channels.
//!
//! Policy: only messages the engine reports `true` for are published, with
//! the payload unmodified, to `"{input}/validated"`. A `false` verdict or a
//! validation error logs the offending message and drops it; nothing is
//! retried or partially published.

use crate::queue::CompletionEvent;
use cluster_client::Transport;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use wire_types::{validated_channel, ValidationError, WireMessage};

/// Apply the validated-only publish policy for one message outcome.
///
/// Fire-and-forget: the subscriber count the transport reports is ignored.
pub async fn forward_outcome(
    transport: &dyn Transport,
    input_channel: &str,
    message: WireMessage,
    outcome: Result<bool, ValidationError>,
) {
    match outcome {
        Ok(true) => {
            let channel = validated_channel(input_channel);
            transport.publish(&channel, message).await;
            debug!(%channel, "Validated message republished");
        }
        Ok(false) => {
            warn!(
                channel = input_channel,
                message = %message.payload(),
                "Invalid message dropped"
            );
        }
        Err(error) => {
            warn!(
                channel = input_channel,
                message = %message.payload(),
                %error,
                "Error validating message, dropped"
            );
        }
    }
}

/// Consumes write-queue completion events and republishes the passing ones.
///
/// Attached to the queue's completion channel exactly once, at node
/// construction.
pub struct Publisher {
    transport: Arc<dyn Transport>,
    input_channel: String,
}

impl Publisher {
    /// Create a publisher for one input channel's completion stream.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, input_channel: impl Into<String>) -> Self {
        Self {
            transport,
            input_channel: input_channel.into(),
        }
    }

    /// Drain completion events until the queue side closes.
    pub async fn run(self, mut completions: mpsc::UnboundedReceiver<CompletionEvent>) {
        while let Some(event) = completions.recv().await {
            forward_outcome(
                self.transport.as_ref(),
                &self.input_channel,
                event.message,
                event.outcome,
            )
            .await;
        }
        debug!(channel = %self.input_channel, "Completion stream closed");
    }
}

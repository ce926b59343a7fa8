//! # Write Serialization Queue
//!
//! FIFO queue that drains write messages through the validation engine
//! strictly one at a time. This is the system's one true serialization
//! point: if message A was enqueued after message B, A is never validated
//! before B's validation resolves, so protocol-level causal ordering of
//! writes is preserved.
//!
//! ## Completion Events
//!
//! Exactly one [`CompletionEvent`] fires per entry, after its validation
//! resolves, carrying the original message and the outcome. The completion
//! receiver is handed out once, at construction; the publisher is its sole
//! consumer.
//!
//! ## Failure Handling
//!
//! An engine error is terminal for its entry only. The error travels out on
//! the completion event; the drain advances to the next entry, so a single
//! malformed or malicious message never stalls the pipeline.

use crate::middleware::{HandlerId, MiddlewareChain, QueueMiddleware};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use suppressor::Suppressor;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use wire_types::{ValidationError, WireMessage};

/// Outcome notification for one queue entry.
#[derive(Debug)]
pub struct CompletionEvent {
    /// The original message, unmodified.
    pub message: WireMessage,
    /// The engine's verdict, or the error it failed with.
    pub outcome: Result<bool, ValidationError>,
}

/// FIFO write serialization queue.
///
/// Cheap to clone; all clones share the same queue instance.
#[derive(Clone)]
pub struct ValidationQueue {
    inner: Arc<QueueInner>,
}

struct QueueInner {
    engine: Arc<dyn Suppressor>,
    pending: Mutex<VecDeque<WireMessage>>,
    draining: AtomicBool,
    middleware: MiddlewareChain,
    completed_tx: mpsc::UnboundedSender<CompletionEvent>,
}

impl ValidationQueue {
    /// Create a queue draining through the given engine.
    ///
    /// Returns the queue and the completion event receiver. The receiver is
    /// handed out exactly once; attach the publisher to it at construction
    /// time.
    #[must_use]
    pub fn new(
        engine: Arc<dyn Suppressor>,
    ) -> (Self, mpsc::UnboundedReceiver<CompletionEvent>) {
        let (completed_tx, completed_rx) = mpsc::unbounded_channel();
        let queue = Self {
            inner: Arc::new(QueueInner {
                engine,
                pending: Mutex::new(VecDeque::new()),
                draining: AtomicBool::new(false),
                middleware: MiddlewareChain::new(),
                completed_tx,
            }),
        };
        (queue, completed_rx)
    }

    /// Append a message to the tail.
    ///
    /// Does not start processing; callers follow up with [`process`].
    ///
    /// [`process`]: ValidationQueue::process
    pub fn enqueue(&self, message: WireMessage) {
        self.inner.pending.lock().push_back(message);
    }

    /// Begin (or continue) draining from the head.
    ///
    /// Idempotent while a drain is running: at most one entry is mid
    /// validation per queue instance.
    pub fn process(&self) {
        if self.inner.draining.swap(true, Ordering::AcqRel) {
            return;
        }
        let inner = Arc::clone(&self.inner);
        tokio::spawn(drain(inner));
    }

    /// Register a middleware handler; applies to all subsequently dequeued
    /// entries.
    pub fn use_handler(&self, handler: Arc<dyn QueueMiddleware>) -> HandlerId {
        self.inner.middleware.register(handler)
    }

    /// Deregister a middleware handler; does not affect the entry currently
    /// in flight. Returns whether it was registered.
    pub fn unuse_handler(&self, id: HandlerId) -> bool {
        self.inner.middleware.deregister(id)
    }

    /// Number of entries waiting to be dequeued.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.inner.pending.lock().len()
    }
}

/// Drain loop: owns the `draining` flag until the queue is empty.
async fn drain(inner: Arc<QueueInner>) {
    loop {
        let Some(message) = inner.pending.lock().pop_front() else {
            inner.draining.store(false, Ordering::Release);
            // An enqueue may have raced the flag reset; reclaim the drain
            // if work appeared and nobody else picked it up.
            if inner.pending.lock().is_empty()
                || inner.draining.swap(true, Ordering::AcqRel)
            {
                return;
            }
            continue;
        };

        // Scoping rule: the chain as of the moment this entry starts.
        let handlers = inner.middleware.snapshot();
        for handler in &handlers {
            handler.before_validate(&message).await;
        }

        let outcome = inner.engine.validate(&message).await;

        for handler in &handlers {
            handler.after_validate(&message, &outcome).await;
        }

        match &outcome {
            Ok(valid) => debug!(valid, "Write validation resolved"),
            Err(error) => warn!(%error, "Write validation failed, advancing queue"),
        }

        if inner
            .completed_tx
            .send(CompletionEvent { message, outcome })
            .is_err()
        {
            // Completion consumer is gone; keep draining so enqueued
            // entries are not stranded.
            debug!("Completion receiver dropped");
        }
    }
}

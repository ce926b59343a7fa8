//! # Queue Middleware
//!
//! Runtime-attachable handlers invoked around each queue entry's processing,
//! for cross-cutting concerns such as metrics or rate limiting.
//!
//! ## Scoping Rules
//!
//! The chain is snapshotted at the moment an entry begins processing:
//!
//! - a handler registered while entries are still pending applies to every
//!   entry dequeued afterwards;
//! - a handler removed mid-drain does not apply to the entry currently in
//!   flight (its snapshot was taken earlier) nor to any later entry.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use wire_types::{ValidationError, WireMessage};

/// Identifier for a registered handler, used to deregister it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// A hook invoked around each queue entry's validation.
///
/// Both hooks default to no-ops so implementations override only the side
/// they care about.
#[async_trait]
pub trait QueueMiddleware: Send + Sync {
    /// Runs before the entry is handed to the validation engine.
    async fn before_validate(&self, message: &WireMessage) {
        let _ = message;
    }

    /// Runs after the engine resolves, with the outcome.
    async fn after_validate(
        &self,
        message: &WireMessage,
        outcome: &Result<bool, ValidationError>,
    ) {
        let _ = (message, outcome);
    }
}

/// Ordered, runtime-mutable collection of middleware handlers.
///
/// Insertion order determines execution order. Mutation never blocks
/// in-flight processing; the drain works from snapshots.
pub struct MiddlewareChain {
    handlers: RwLock<Vec<(HandlerId, Arc<dyn QueueMiddleware>)>>,
    next_id: AtomicU64,
}

impl MiddlewareChain {
    /// Create an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Register a handler at the end of the chain.
    pub fn register(&self, handler: Arc<dyn QueueMiddleware>) -> HandlerId {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.write().push((id, handler));
        id
    }

    /// Deregister a handler. Returns whether it was present.
    pub fn deregister(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    /// Snapshot the chain in execution order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<dyn QueueMiddleware>> {
        self.handlers
            .read()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect()
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.read().len()
    }

    /// Whether the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.read().is_empty()
    }
}

impl Default for MiddlewareChain {
    fn default() -> Self {
        Self::new()
    }
}

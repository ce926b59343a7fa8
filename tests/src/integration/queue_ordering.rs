//! # Write Serialization Tests
//!
//! The FIFO queue invariants under an instrumented validation engine:
//! strict completion order, no overlapping validation, terminal errors that
//! do not stall the drain, and middleware scoping at dequeue time.

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use rand::Rng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use suppressor::Suppressor;
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::time::timeout;
    use validator_node::{CompletionEvent, QueueMiddleware, ValidationQueue};
    use wire_types::{ValidationError, WireMessage};

    /// Engine with randomized latency that asserts it is never re-entered.
    struct InstrumentedEngine {
        active: AtomicUsize,
        max_active: AtomicUsize,
        calls: AtomicUsize,
    }

    impl InstrumentedEngine {
        fn new() -> Self {
            Self {
                active: AtomicUsize::new(0),
                max_active: AtomicUsize::new(0),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Suppressor for InstrumentedEngine {
        async fn validate(&self, message: &WireMessage) -> Result<bool, ValidationError> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);
            self.calls.fetch_add(1, Ordering::SeqCst);

            let delay = rand::thread_rng().gen_range(1..10);
            tokio::time::sleep(Duration::from_millis(delay)).await;

            self.active.fetch_sub(1, Ordering::SeqCst);
            match message.payload().get("verdict").and_then(|v| v.as_str()) {
                Some("reject") => Ok(false),
                Some("fail") => Err(ValidationError::RuleFailed("scripted failure".into())),
                _ => Ok(true),
            }
        }
    }

    /// Middleware that records observed sequence numbers in a bitmask.
    #[derive(Default)]
    struct SeqRecorder {
        seen: std::sync::atomic::AtomicU64,
    }

    impl SeqRecorder {
        fn contains(&self, seq: u64) -> bool {
            self.seen.load(Ordering::SeqCst) & (1 << seq) != 0
        }
    }

    #[async_trait]
    impl QueueMiddleware for SeqRecorder {
        async fn before_validate(&self, message: &WireMessage) {
            if let Some(seq) = message.payload().get("seq").and_then(|v| v.as_u64()) {
                self.seen.fetch_or(1 << seq, Ordering::SeqCst);
            }
        }
    }

    fn seq_message(seq: u64) -> WireMessage {
        WireMessage::new(serde_json::json!({ "seq": seq }))
    }

    async fn next_completion(completions: &mut UnboundedReceiver<CompletionEvent>) -> CompletionEvent {
        timeout(Duration::from_secs(2), completions.recv())
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_fifo_order_under_randomized_latency() {
        let engine = Arc::new(InstrumentedEngine::new());
        let (queue, mut completions) =
            ValidationQueue::new(Arc::clone(&engine) as Arc<dyn Suppressor>);

        for seq in 0..20 {
            queue.enqueue(seq_message(seq));
        }
        queue.process();

        for expected in 0..20u64 {
            let event = next_completion(&mut completions).await;
            let seq = event.message.payload()["seq"].as_u64().unwrap();
            assert_eq!(seq, expected);
        }
    }

    #[tokio::test]
    async fn test_no_overlapping_validation() {
        let engine = Arc::new(InstrumentedEngine::new());
        let (queue, mut completions) =
            ValidationQueue::new(Arc::clone(&engine) as Arc<dyn Suppressor>);

        for seq in 0..10 {
            queue.enqueue(seq_message(seq));
            // Repeated process calls while draining must not start a second
            // drain task.
            queue.process();
        }

        for _ in 0..10 {
            next_completion(&mut completions).await;
        }

        assert_eq!(engine.calls.load(Ordering::SeqCst), 10);
        assert_eq!(engine.max_active.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_terminal_error_does_not_stall_drain() {
        let engine = Arc::new(InstrumentedEngine::new());
        let (queue, mut completions) =
            ValidationQueue::new(Arc::clone(&engine) as Arc<dyn Suppressor>);

        queue.enqueue(WireMessage::new(serde_json::json!({ "seq": 0, "verdict": "fail" })));
        queue.enqueue(seq_message(1));
        queue.process();

        let first = next_completion(&mut completions).await;
        assert!(first.outcome.is_err());

        let second = next_completion(&mut completions).await;
        assert_eq!(second.outcome, Ok(true));
        assert_eq!(second.message.payload()["seq"].as_u64(), Some(1));
    }

    #[tokio::test]
    async fn test_rejection_reported_not_dropped() {
        let engine = Arc::new(InstrumentedEngine::new());
        let (queue, mut completions) =
            ValidationQueue::new(Arc::clone(&engine) as Arc<dyn Suppressor>);

        queue.enqueue(WireMessage::new(serde_json::json!({ "seq": 0, "verdict": "reject" })));
        queue.process();

        let event = next_completion(&mut completions).await;
        assert_eq!(event.outcome, Ok(false));
    }

    #[tokio::test]
    async fn test_middleware_added_before_dequeue_sees_all_pending() {
        let engine = Arc::new(InstrumentedEngine::new());
        let (queue, mut completions) =
            ValidationQueue::new(Arc::clone(&engine) as Arc<dyn Suppressor>);

        // Entries are pending before the handler exists.
        for seq in 0..3 {
            queue.enqueue(seq_message(seq));
        }
        let recorder = Arc::new(SeqRecorder::default());
        queue.use_handler(Arc::clone(&recorder) as Arc<dyn QueueMiddleware>);
        queue.process();

        for _ in 0..3 {
            next_completion(&mut completions).await;
        }
        for seq in 0..3 {
            assert!(recorder.contains(seq));
        }
    }

    #[tokio::test]
    async fn test_removed_middleware_stops_applying() {
        let engine = Arc::new(InstrumentedEngine::new());
        let (queue, mut completions) =
            ValidationQueue::new(Arc::clone(&engine) as Arc<dyn Suppressor>);

        let recorder = Arc::new(SeqRecorder::default());
        let id = queue.use_handler(Arc::clone(&recorder) as Arc<dyn QueueMiddleware>);

        queue.enqueue(seq_message(0));
        queue.process();
        next_completion(&mut completions).await;

        assert!(queue.unuse_handler(id));

        queue.enqueue(seq_message(1));
        queue.process();
        next_completion(&mut completions).await;

        assert!(recorder.contains(0));
        assert!(!recorder.contains(1));
    }
}

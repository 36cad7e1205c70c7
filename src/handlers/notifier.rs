//! Event Notifier
//!
//! Best-effort delivery of lifecycle events to the configured sink.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::TransactionEvent;
use crate::ports::{EventPublisher, PublishError};

/// Queue that lifecycle events go to unless configured otherwise
pub const DEFAULT_EVENT_QUEUE: &str = "transaction_events";

/// How long a caller waits for a publish attempt before moving on
pub const DEFAULT_PUBLISH_TIMEOUT: Duration = Duration::from_secs(2);

/// Wraps an `EventPublisher` so that publishing can never fail the
/// operation that triggered it.
///
/// Each attempt runs on its own tokio task, which logs its own outcome.
/// Dropping the caller's future does not cancel an attempt that has already
/// been spawned.
///
/// The caller then waits at most `timeout` for the attempt, so a stalled
/// sink adds up to `timeout` of latency to the request before the attempt
/// is left to finish in the background. A zero `timeout` returns as soon as
/// the attempt is spawned.
#[derive(Clone)]
pub struct EventNotifier {
    publisher: Arc<dyn EventPublisher>,
    topic: Arc<str>,
    timeout: Duration,
}

impl EventNotifier {
    pub fn new(publisher: Arc<dyn EventPublisher>, topic: impl Into<String>) -> Self {
        Self {
            publisher,
            topic: Arc::from(topic.into()),
            timeout: DEFAULT_PUBLISH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Publish `event` once. Failures are logged and swallowed.
    pub async fn notify(&self, event: TransactionEvent) {
        let event_type = event.event_type;
        let transaction_id = event.transaction.id;

        if let Err(e) = self.dispatch(&event).await {
            tracing::warn!(
                event_type = %event_type,
                transaction_id = %transaction_id,
                queue = %self.topic,
                error = %e,
                "Lifecycle event not confirmed"
            );
        }
    }

    /// Spawn the attempt and wait for it within `timeout`.
    ///
    /// Errors returned here are about the wait (elapsed, task panicked).
    /// The sink's own result is logged by the spawned task.
    async fn dispatch(&self, event: &TransactionEvent) -> Result<(), PublishError> {
        let payload = serde_json::to_value(event)?;
        let publisher = Arc::clone(&self.publisher);
        let topic = Arc::clone(&self.topic);
        let event_type = event.event_type;
        let transaction_id = event.transaction.id;

        // Spawned before the first await so a cancelled caller can't suppress it
        let attempt = tokio::spawn(async move {
            match publisher.publish(&topic, &payload).await {
                Ok(()) => tracing::debug!(
                    event_type = %event_type,
                    transaction_id = %transaction_id,
                    queue = %topic,
                    "Lifecycle event published"
                ),
                Err(e) => tracing::warn!(
                    event_type = %event_type,
                    transaction_id = %transaction_id,
                    queue = %topic,
                    error = %e,
                    "Failed to publish lifecycle event"
                ),
            }
        });

        if self.timeout.is_zero() {
            return Ok(());
        }

        match tokio::time::timeout(self.timeout, attempt).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(join_error)) => Err(PublishError::Rejected(format!(
                "publish task failed: {}",
                join_error
            ))),
            Err(_) => Err(PublishError::Timeout(self.timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Amount, Transaction, TransactionType};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    struct SlowPublisher {
        calls: AtomicUsize,
        delay: Duration,
    }

    #[async_trait]
    impl EventPublisher for SlowPublisher {
        async fn publish(&self, _topic: &str, _payload: &serde_json::Value) -> Result<(), PublishError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(())
        }
    }

    struct PanickingPublisher;

    #[async_trait]
    impl EventPublisher for PanickingPublisher {
        async fn publish(&self, _topic: &str, _payload: &serde_json::Value) -> Result<(), PublishError> {
            panic!("sink exploded");
        }
    }

    fn event() -> TransactionEvent {
        TransactionEvent::created(Transaction::new(
            Uuid::new_v4(),
            Amount::new(dec!(1)).unwrap(),
            "USD".to_string(),
            TransactionType::Deposit,
            None,
        ))
    }

    #[tokio::test]
    async fn test_slow_sink_times_out_without_failing() {
        let publisher = Arc::new(SlowPublisher {
            calls: AtomicUsize::new(0),
            delay: Duration::from_secs(5),
        });
        let notifier = EventNotifier::new(publisher.clone(), DEFAULT_EVENT_QUEUE)
            .with_timeout(Duration::from_millis(20));

        let result = notifier.dispatch(&event()).await;
        assert!(matches!(result, Err(PublishError::Timeout(_))));
        assert_eq!(publisher.calls.load(Ordering::SeqCst), 1);

        // notify itself never surfaces the failure
        notifier.notify(event()).await;
    }

    #[tokio::test]
    async fn test_zero_timeout_returns_before_the_sink_finishes() {
        let publisher = Arc::new(SlowPublisher {
            calls: AtomicUsize::new(0),
            delay: Duration::from_millis(50),
        });
        let notifier =
            EventNotifier::new(publisher.clone(), DEFAULT_EVENT_QUEUE).with_timeout(Duration::ZERO);

        let started = std::time::Instant::now();
        assert!(notifier.dispatch(&event()).await.is_ok());
        assert!(started.elapsed() < Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(publisher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failing_sink_is_reported_by_the_attempt() {
        struct Refusing;

        #[async_trait]
        impl EventPublisher for Refusing {
            async fn publish(&self, _topic: &str, _payload: &serde_json::Value) -> Result<(), PublishError> {
                Err(PublishError::Rejected("queue full".to_string()))
            }
        }

        let notifier = EventNotifier::new(Arc::new(Refusing), DEFAULT_EVENT_QUEUE);
        assert!(notifier.dispatch(&event()).await.is_ok());
    }

    #[tokio::test]
    async fn test_panicking_sink_is_contained() {
        let notifier = EventNotifier::new(Arc::new(PanickingPublisher), "events");

        let result = notifier.dispatch(&event()).await;
        assert!(matches!(result, Err(PublishError::Rejected(_))));
        assert_eq!(notifier.topic(), "events");
    }
}

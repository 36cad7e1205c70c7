//! Event sink port
//!
//! Publish-only contract for lifecycle notifications. No ordering, delivery
//! or exactly-once guarantee is expected from implementations.

use async_trait::async_trait;
use std::time::Duration;

/// Errors reported by an event publisher
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("failed to serialize event: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("publish timed out after {0:?}")]
    Timeout(Duration),

    #[error("publish rejected: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish one JSON payload to `topic`.
    async fn publish(&self, topic: &str, payload: &serde_json::Value) -> Result<(), PublishError>;
}

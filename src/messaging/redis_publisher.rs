//! Redis event publisher
//!
//! Pushes lifecycle events onto a Redis list that acts as a durable work
//! queue. Consumers pop from the other end.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::ports::{EventPublisher, PublishError};

/// Publisher backed by a single multiplexed Redis connection.
///
/// The connection is opened once by the composition root and shared by
/// every request; cloning the publisher clones the handle, not the socket.
#[derive(Clone)]
pub struct RedisEventPublisher {
    conn: MultiplexedConnection,
}

impl RedisEventPublisher {
    /// Open the connection and verify it with `PING`
    pub async fn connect(redis_url: &str) -> Result<Self, PublishError> {
        let client = redis::Client::open(redis_url)?;
        let mut conn = client.get_multiplexed_async_connection().await?;

        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        tracing::info!(reply = %pong, "Redis connection established");

        Ok(Self { conn })
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish(&self, topic: &str, payload: &serde_json::Value) -> Result<(), PublishError> {
        let body = serde_json::to_string(payload)?;
        let mut conn = self.conn.clone();

        let depth: i64 = conn.rpush(topic, body).await?;
        tracing::debug!(queue = topic, depth, "Message published to queue");

        Ok(())
    }
}

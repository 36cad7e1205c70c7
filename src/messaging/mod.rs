//! Messaging
//!
//! Event sink adapters.

mod redis_publisher;

pub use redis_publisher::RedisEventPublisher;

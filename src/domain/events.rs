//! Lifecycle Events
//!
//! Notifications emitted to downstream consumers whenever a transaction is
//! created or changes status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Transaction;

/// Which lifecycle change an event describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEventType {
    #[serde(rename = "transaction.created")]
    Created,
    #[serde(rename = "transaction.updated")]
    Updated,
}

impl LifecycleEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleEventType::Created => "transaction.created",
            LifecycleEventType::Updated => "transaction.updated",
        }
    }
}

impl std::fmt::Display for LifecycleEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event payload published to the sink.
///
/// `timestamp` is the emission time and is independent of the record's own
/// `created_at` / `updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionEvent {
    pub event_type: LifecycleEventType,
    pub transaction: Transaction,
    pub timestamp: DateTime<Utc>,
}

impl TransactionEvent {
    pub fn new(event_type: LifecycleEventType, transaction: Transaction) -> Self {
        Self {
            event_type,
            transaction,
            timestamp: Utc::now(),
        }
    }

    pub fn created(transaction: Transaction) -> Self {
        Self::new(LifecycleEventType::Created, transaction)
    }

    pub fn updated(transaction: Transaction) -> Self {
        Self::new(LifecycleEventType::Updated, transaction)
    }
}

//! Domain module
//!
//! Core domain types and validation rules.

pub mod amount;
pub mod context;
pub mod error;
pub mod events;
pub mod transaction;

pub use amount::Amount;
pub use context::OperationContext;
pub use error::DomainError;
pub use events::{LifecycleEventType, TransactionEvent};
pub use transaction::{Transaction, TransactionStatus, TransactionType};

//! Handlers module
//!
//! The transaction lifecycle manager and the commands it accepts.
//! Handlers coordinate validation, the repository and event notification.

mod commands;
mod notifier;
mod transaction_handler;


pub use commands::*;
pub use notifier::{EventNotifier, DEFAULT_EVENT_QUEUE, DEFAULT_PUBLISH_TIMEOUT};
pub use transaction_handler::TransactionHandler;

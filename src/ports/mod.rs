//! Ports
//!
//! Traits for the external collaborators the lifecycle manager depends on.
//! Adapters live in `repository` and `messaging`.

pub mod publisher;
pub mod repository;

pub use publisher::{EventPublisher, PublishError};
pub use repository::{RepositoryError, RepositoryResult, TransactionRepository};

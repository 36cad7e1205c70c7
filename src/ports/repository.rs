//! Persistence port
//!
//! Contract for storing and retrieving transaction records.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Transaction, TransactionStatus};

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors reported by a transaction repository
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// No record matched, or an update affected zero rows
    #[error("transaction not found: {0}")]
    NotFound(String),

    /// A stored row could not be mapped back to a `Transaction`
    #[error("invalid stored data: {0}")]
    InvalidData(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Backend unreachable or refusing work
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound(_))
    }
}

/// Persistence contract consumed by the lifecycle manager.
///
/// Every list operation returns records ordered by `created_at` descending,
/// ties broken by `id` descending. Cancellation is by dropping the returned
/// future; implementations must not leave partial writes behind when that
/// happens mid-statement.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Insert a new record.
    async fn create(&self, transaction: &Transaction) -> RepositoryResult<()>;

    /// Fetch one record, `NotFound` when absent.
    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Transaction>;

    /// Records owned by `user_id`.
    async fn get_by_user_id(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<Transaction>>;

    /// Persist the mutable fields (`status`, `updated_at`) of an existing
    /// record. Zero affected rows is reported as `NotFound`.
    async fn update(&self, transaction: &Transaction) -> RepositoryResult<()>;

    /// All records.
    async fn get_all(&self, limit: i64, offset: i64) -> RepositoryResult<Vec<Transaction>>;

    /// Records currently in `status`.
    async fn get_by_status(
        &self,
        status: TransactionStatus,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<Transaction>>;

    /// Whether a user with this id exists.
    async fn user_exists(&self, user_id: Uuid) -> RepositoryResult<bool>;
}

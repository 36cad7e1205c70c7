//! In-memory implementation of `TransactionRepository`.
//!
//! Process-local storage with the same ordering and not-found semantics as
//! the Postgres adapter. Used by the test suites and for running the API
//! without a database.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{Transaction, TransactionStatus};
use crate::ports::{RepositoryError, RepositoryResult, TransactionRepository};

#[derive(Debug, Default)]
pub struct InMemoryTransactionRepository {
    transactions: RwLock<HashMap<Uuid, Transaction>>,
    users: RwLock<HashSet<Uuid>>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with a set of known users
    pub fn with_users(users: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            transactions: RwLock::default(),
            users: RwLock::new(users.into_iter().collect()),
        }
    }

    pub async fn add_user(&self, user_id: Uuid) {
        self.users.write().await.insert(user_id);
    }

    /// Remove a record, returning it if it existed
    pub async fn remove(&self, id: Uuid) -> Option<Transaction> {
        self.transactions.write().await.remove(&id)
    }

    pub async fn len(&self) -> usize {
        self.transactions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.transactions.read().await.is_empty()
    }

    async fn page_where<F>(&self, limit: i64, offset: i64, keep: F) -> Vec<Transaction>
    where
        F: Fn(&Transaction) -> bool,
    {
        let transactions = self.transactions.read().await;
        let mut matching: Vec<Transaction> =
            transactions.values().filter(|tx| keep(tx)).cloned().collect();

        // Newest first, id as tie-breaker
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn create(&self, transaction: &Transaction) -> RepositoryResult<()> {
        let mut transactions = self.transactions.write().await;
        if transactions.contains_key(&transaction.id) {
            return Err(RepositoryError::Unavailable(format!(
                "duplicate transaction id {}",
                transaction.id
            )));
        }
        transactions.insert(transaction.id, transaction.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Transaction> {
        self.transactions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn get_by_user_id(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<Transaction>> {
        Ok(self
            .page_where(limit, offset, |tx| tx.user_id == user_id)
            .await)
    }

    async fn update(&self, transaction: &Transaction) -> RepositoryResult<()> {
        let mut transactions = self.transactions.write().await;
        let stored = transactions
            .get_mut(&transaction.id)
            .ok_or_else(|| RepositoryError::NotFound(transaction.id.to_string()))?;

        stored.status = transaction.status;
        stored.updated_at = transaction.updated_at;
        Ok(())
    }

    async fn get_all(&self, limit: i64, offset: i64) -> RepositoryResult<Vec<Transaction>> {
        Ok(self.page_where(limit, offset, |_| true).await)
    }

    async fn get_by_status(
        &self,
        status: TransactionStatus,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<Transaction>> {
        Ok(self
            .page_where(limit, offset, |tx| tx.status == status)
            .await)
    }

    async fn user_exists(&self, user_id: Uuid) -> RepositoryResult<bool> {
        Ok(self.users.read().await.contains(&user_id))
    }
}

//! Postgres implementation of `TransactionRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Transaction, TransactionStatus};
use crate::ports::{RepositoryError, RepositoryResult, TransactionRepository};

const SELECT_COLUMNS: &str = r#"
    SELECT id, user_id, amount, currency, transaction_type, status, description, created_at, updated_at
    FROM transactions
"#;

/// Postgres-backed transaction repository.
#[derive(Debug, Clone)]
pub struct PgTransactionRepository {
    pool: PgPool,
}

impl PgTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn rows_into_domain(rows: Vec<TransactionRow>) -> RepositoryResult<Vec<Transaction>> {
        rows.into_iter().map(TransactionRow::into_domain).collect()
    }
}

#[async_trait]
impl TransactionRepository for PgTransactionRepository {
    async fn create(&self, transaction: &Transaction) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, user_id, amount, currency, transaction_type, status,
                description, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(transaction.id)
        .bind(transaction.user_id)
        .bind(transaction.amount)
        .bind(&transaction.currency)
        .bind(transaction.transaction_type.as_str())
        .bind(transaction.status.as_str())
        .bind(&transaction.description)
        .bind(transaction.created_at)
        .bind(transaction.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Transaction> {
        let row: Option<TransactionRow> =
            sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.ok_or_else(|| RepositoryError::NotFound(id.to_string()))?
            .into_domain()
    }

    async fn get_by_user_id(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<Transaction>> {
        let rows: Vec<TransactionRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} WHERE user_id = $1 ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Self::rows_into_domain(rows)
    }

    async fn update(&self, transaction: &Transaction) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET status = $1, updated_at = $2
            WHERE id = $3
            "#,
        )
        .bind(transaction.status.as_str())
        .bind(transaction.updated_at)
        .bind(transaction.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(transaction.id.to_string()));
        }

        Ok(())
    }

    async fn get_all(&self, limit: i64, offset: i64) -> RepositoryResult<Vec<Transaction>> {
        let rows: Vec<TransactionRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Self::rows_into_domain(rows)
    }

    async fn get_by_status(
        &self,
        status: TransactionStatus,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<Transaction>> {
        let rows: Vec<TransactionRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} WHERE status = $1 ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(status.as_str())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Self::rows_into_domain(rows)
    }

    async fn user_exists(&self, user_id: Uuid) -> RepositoryResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}

/// Internal row type for SQLx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    user_id: Uuid,
    amount: Decimal,
    currency: String,
    transaction_type: String,
    status: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TransactionRow {
    fn into_domain(self) -> RepositoryResult<Transaction> {
        let transaction_type = self.transaction_type.parse().map_err(|_| {
            RepositoryError::InvalidData(format!(
                "transaction {} has unknown type '{}'",
                self.id, self.transaction_type
            ))
        })?;
        let status = self.status.parse().map_err(|_| {
            RepositoryError::InvalidData(format!(
                "transaction {} has unknown status '{}'",
                self.id, self.status
            ))
        })?;

        Ok(Transaction {
            id: self.id,
            user_id: self.user_id,
            amount: self.amount,
            currency: self.currency,
            transaction_type,
            status,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionType;
    use rust_decimal_macros::dec;

    fn row(transaction_type: &str, status: &str) -> TransactionRow {
        let now = Utc::now();
        TransactionRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            amount: dec!(12.34),
            currency: "USD".to_string(),
            transaction_type: transaction_type.to_string(),
            status: status.to_string(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_row_into_domain() {
        let tx = row("withdraw", "failed").into_domain().unwrap();
        assert_eq!(tx.transaction_type, TransactionType::Withdraw);
        assert_eq!(tx.status, TransactionStatus::Failed);
        assert_eq!(tx.amount, dec!(12.34));
    }

    #[test]
    fn test_row_with_unknown_status_is_invalid_data() {
        let err = row("deposit", "archived").into_domain().unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidData(msg) if msg.contains("archived")));
    }
}

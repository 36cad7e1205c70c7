//! Transaction Handler
//!
//! Lifecycle manager for transactions: validation, status changes,
//! pagination, persistence and event notification.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    Amount, DomainError, OperationContext, Transaction, TransactionEvent, TransactionStatus,
    TransactionType,
};
use crate::error::{AppError, AppResult};
use crate::ports::TransactionRepository;

use super::{CreateTransactionCommand, EventNotifier, PageRequest};

/// Stateless between calls; all state lives behind the repository.
#[derive(Clone)]
pub struct TransactionHandler {
    repository: Arc<dyn TransactionRepository>,
    notifier: EventNotifier,
}

impl TransactionHandler {
    pub fn new(repository: Arc<dyn TransactionRepository>, notifier: EventNotifier) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    // =====================================================================
    // Commands
    // =====================================================================

    /// Record a new `pending` transaction owned by the caller.
    ///
    /// Validation runs in a fixed order (amount, currency, type, owner) and
    /// nothing is written unless all of it passes. A `transaction.created`
    /// event is attempted once the insert has succeeded.
    pub async fn create(
        &self,
        command: CreateTransactionCommand,
        context: &OperationContext,
    ) -> AppResult<Transaction> {
        let user_id = require_principal(context)?;

        let amount = Amount::new(command.amount)?;

        let currency = command.currency.trim();
        if currency.is_empty() {
            return Err(DomainError::MissingCurrency.into());
        }

        let transaction_type: TransactionType =
            command.transaction_type.parse().map_err(|e: DomainError| {
                tracing::debug!(
                    transaction_type = %command.transaction_type,
                    "Rejected transaction type"
                );
                AppError::from(e)
            })?;

        let exists = self
            .repository
            .user_exists(user_id)
            .await
            .map_err(|e| AppError::from_repository(e, "failed to validate user"))?;
        if !exists {
            return Err(AppError::NotFound("user does not exist".to_string()));
        }

        let transaction = Transaction::new(
            user_id,
            amount,
            currency.to_string(),
            transaction_type,
            command.description,
        );

        self.repository
            .create(&transaction)
            .await
            .map_err(|e| AppError::from_repository(e, "failed to create transaction"))?;

        tracing::info!(
            transaction_id = %transaction.id,
            user_id = %user_id,
            amount = %transaction.amount,
            currency = %transaction.currency,
            transaction_type = %transaction.transaction_type,
            correlation_id = ?context.correlation_id,
            "Transaction created"
        );

        self.notifier
            .notify(TransactionEvent::created(transaction.clone()))
            .await;

        Ok(transaction)
    }

    /// Move a transaction to `status`.
    ///
    /// Any status may follow any other. A `transaction.updated` event is
    /// attempted once the write has succeeded.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: &str,
        context: &OperationContext,
    ) -> AppResult<Transaction> {
        let status: TransactionStatus = status.parse()?;

        let mut transaction = self
            .repository
            .get_by_id(id)
            .await
            .map_err(|e| AppError::from_repository(e, "failed to load transaction"))?;

        let previous = transaction.status;
        transaction.transition_to(status);

        // Zero rows affected means the record vanished after the read
        self.repository
            .update(&transaction)
            .await
            .map_err(|e| AppError::from_repository(e, "failed to update transaction"))?;

        tracing::info!(
            transaction_id = %transaction.id,
            from = %previous,
            to = %status,
            correlation_id = ?context.correlation_id,
            "Transaction status updated"
        );

        self.notifier
            .notify(TransactionEvent::updated(transaction.clone()))
            .await;

        Ok(transaction)
    }

    // =====================================================================
    // Queries
    // =====================================================================

    pub async fn get(&self, id: Uuid) -> AppResult<Transaction> {
        self.repository
            .get_by_id(id)
            .await
            .map_err(|e| AppError::from_repository(e, "failed to get transaction"))
    }

    /// The caller's own transactions, newest first.
    pub async fn list_for_user(
        &self,
        context: &OperationContext,
        page: PageRequest,
    ) -> AppResult<Vec<Transaction>> {
        let user_id = require_principal(context)?;

        tracing::debug!(
            user_id = %user_id,
            page = page.page,
            page_size = page.page_size,
            "Listing user transactions"
        );

        self.repository
            .get_by_user_id(user_id, page.limit(), page.offset())
            .await
            .map_err(|e| AppError::from_repository(e, "failed to get transactions"))
    }

    /// Every transaction, newest first. Callers are expected to be trusted.
    pub async fn list_all(&self, page: PageRequest) -> AppResult<Vec<Transaction>> {
        tracing::debug!(page = page.page, page_size = page.page_size, "Listing all transactions");

        self.repository
            .get_all(page.limit(), page.offset())
            .await
            .map_err(|e| AppError::from_repository(e, "failed to get transactions"))
    }

    pub async fn list_by_status(
        &self,
        status: &str,
        page: PageRequest,
    ) -> AppResult<Vec<Transaction>> {
        let status: TransactionStatus = status.parse()?;

        tracing::debug!(
            status = %status,
            page = page.page,
            page_size = page.page_size,
            "Listing transactions by status"
        );

        self.repository
            .get_by_status(status, page.limit(), page.offset())
            .await
            .map_err(|e| AppError::from_repository(e, "failed to get transactions"))
    }
}

fn require_principal(context: &OperationContext) -> AppResult<Uuid> {
    context
        .principal()
        .ok_or_else(|| AppError::Unauthenticated("user not authenticated".to_string()))
}

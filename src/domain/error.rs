//! Domain Error Types
//!
//! Pure validation errors that don't depend on infrastructure.

use thiserror::Error;

/// Validation failures for transaction input.
///
/// The messages are part of the API contract: clients match on them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Amount is zero, negative or not a number
    #[error("amount must be greater than 0")]
    InvalidAmount,

    /// Currency code is empty
    #[error("currency is required")]
    MissingCurrency,

    /// Transaction type outside {deposit, withdraw, purchase}
    #[error("invalid transaction type")]
    InvalidTransactionType(String),

    /// Status outside {pending, success, failed}
    #[error("invalid status")]
    InvalidStatus(String),
}

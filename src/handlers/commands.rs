//! Command definitions
//!
//! Commands represent intentions to change the system state. Paging
//! requests live here too since every list operation shares them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Page used when the caller asks for page < 1
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the caller asks for < 1
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Hard upper bound on records per page; larger requests are clamped to it
pub const MAX_PAGE_SIZE: i64 = 100;

// =========================================================================
// CreateTransactionCommand
// =========================================================================

/// Command to record a new transaction for the calling user.
///
/// Carries no owner. The owner is always the authenticated principal in the
/// `OperationContext`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionCommand {
    pub amount: Decimal,
    pub currency: String,
    /// Raw type string, validated by the handler
    pub transaction_type: String,
    pub description: Option<String>,
}

impl CreateTransactionCommand {
    pub fn new(amount: Decimal, currency: impl Into<String>, transaction_type: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
            transaction_type: transaction_type.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// =========================================================================
// PageRequest
// =========================================================================

/// Normalized pagination window.
///
/// Construction clamps out-of-range input instead of rejecting it, so every
/// `PageRequest` is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64) -> Self {
        let page = if page < 1 { DEFAULT_PAGE } else { page };
        let page_size = if page_size < 1 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size.min(MAX_PAGE_SIZE)
        };
        Self { page, page_size }
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_create_command_builder() {
        let cmd = CreateTransactionCommand::new(dec!(100.0), "USD", "deposit")
            .with_description("salary");

        assert_eq!(cmd.amount, dec!(100.0));
        assert_eq!(cmd.currency, "USD");
        assert_eq!(cmd.transaction_type, "deposit");
        assert_eq!(cmd.description.as_deref(), Some("salary"));
    }

    #[test]
    fn test_page_request_defaults() {
        assert_eq!(PageRequest::new(0, 0), PageRequest::new(1, 10));
        assert_eq!(PageRequest::new(-3, -1), PageRequest::default());
    }

    #[test]
    fn test_page_size_bounds() {
        assert_eq!(PageRequest::new(1, 100).page_size, 100);
        assert_eq!(PageRequest::new(1, 101).page_size, MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(1, 500).page_size, MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(1, 1).page_size, 1);
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
        assert_eq!(PageRequest::new(3, 25).offset(), 50);
        assert_eq!(PageRequest::new(3, 25).limit(), 25);
    }
}

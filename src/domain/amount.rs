//! Amount type
//!
//! Domain primitive for transaction magnitudes. An `Amount` is validated at
//! construction, so a non-positive value cannot reach the repository.

use rust_decimal::Decimal;

use super::DomainError;

/// A strictly positive, currency-agnostic decimal magnitude.
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use transaction_streaming::domain::Amount;
///
/// let amount = Amount::new(Decimal::new(100, 0)).unwrap();
/// assert_eq!(amount.value(), Decimal::new(100, 0));
/// assert!(Amount::new(Decimal::ZERO).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(Decimal);

impl Amount {
    /// Create a new Amount.
    ///
    /// # Errors
    /// `DomainError::InvalidAmount` if `value <= 0`.
    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        if value <= Decimal::ZERO {
            return Err(DomainError::InvalidAmount);
        }
        Ok(Self(value))
    }

    /// Get the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

//! Transaction entity
//!
//! The record tracked through its lifecycle, plus the two closed
//! enumerations it carries.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{Amount, DomainError};

// =========================================================================
// TransactionType
// =========================================================================

/// Kind of money movement. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Deposit,
    Withdraw,
    Purchase,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdraw => "withdraw",
            TransactionType::Purchase => "purchase",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(TransactionType::Deposit),
            "withdraw" => Ok(TransactionType::Withdraw),
            "purchase" => Ok(TransactionType::Purchase),
            other => Err(DomainError::InvalidTransactionType(other.to_string())),
        }
    }
}

// =========================================================================
// TransactionStatus
// =========================================================================

/// Processing status.
///
/// Every status may move to every other status; there is no terminal
/// state. The only rule is membership in this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Success => "success",
            TransactionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "success" => Ok(TransactionStatus::Success),
            "failed" => Ok(TransactionStatus::Failed),
            other => Err(DomainError::InvalidStatus(other.to_string())),
        }
    }
}

// =========================================================================
// Transaction
// =========================================================================

/// A financial transaction owned by a single user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Build a fresh `pending` record with a server-assigned id.
    ///
    /// Timestamps are truncated to microseconds, the precision Postgres
    /// stores, so the returned record equals what a later read yields.
    pub fn new(
        user_id: Uuid,
        amount: Amount,
        currency: String,
        transaction_type: TransactionType,
        description: Option<String>,
    ) -> Self {
        let now = Utc::now().trunc_subsecs(6);
        Self {
            id: Uuid::new_v4(),
            user_id,
            amount: amount.value(),
            currency,
            transaction_type,
            status: TransactionStatus::Pending,
            description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to `status` and refresh `updated_at`.
    ///
    /// `updated_at` always ends up strictly later than before, even when the
    /// clock has not advanced a full microsecond since the last write.
    pub fn transition_to(&mut self, status: TransactionStatus) {
        let now = Utc::now().trunc_subsecs(6);
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
        self.status = status;
    }
}

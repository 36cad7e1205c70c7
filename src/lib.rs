//! Transaction streaming library
//!
//! Re-exports modules for the server binary and integration testing.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod messaging;
pub mod ports;
pub mod repository;

pub use config::Config;
pub use domain::{Amount, DomainError, OperationContext, Transaction, TransactionStatus, TransactionType};
pub use error::{AppError, AppResult, ErrorKind};

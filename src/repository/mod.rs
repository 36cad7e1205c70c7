//! Repository adapters
//!
//! Implementations of the persistence port.

mod memory;
mod postgres;

pub use memory::InMemoryTransactionRepository;
pub use postgres::PgTransactionRepository;

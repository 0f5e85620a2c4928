//! In-memory adapters for local runs and HTTP tests.
//!
//! State lives for the life of the process. [`MemoryReports`] joins against
//! the [`MemoryAccounts`] it was built with, mirroring the foreign key the
//! PostgreSQL schema enforces.

mod accounts;
mod reports;

pub use accounts::MemoryAccounts;
pub use reports::MemoryReports;

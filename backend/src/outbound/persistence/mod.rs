//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories are thin: they translate between Diesel rows and domain
//! types and map driver failures to port errors. Row structs (`models.rs`)
//! and table definitions (`schema.rs`) stay private to this module.
//!
//! ```ignore
//! use lab_reports::outbound::persistence::{DbPool, DieselReportRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/lab_reports")).await?;
//! let reports = DieselReportRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_identity_provider;
mod diesel_profile_repository;
mod diesel_report_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_identity_provider::DieselIdentityProvider;
pub use diesel_profile_repository::DieselProfileRepository;
pub use diesel_report_repository::DieselReportRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

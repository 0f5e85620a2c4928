//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories and identity store via Diesel.
//! - **memory**: in-process equivalents for local runs and tests.
//! - **storage**: write-once photo stores on disk or in memory.
//!
//! Adapters translate between domain types and infrastructure
//! representations. They hold no business rules.

pub mod memory;
pub mod password;
pub mod persistence;
pub mod storage;

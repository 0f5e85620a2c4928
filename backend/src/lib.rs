//! 5R lab report backend.
//!
//! Students submit before/after photos for the five 5R categories; teachers
//! review the submissions and set their status. The crate follows a
//! hexagonal layout: [`domain`] owns types, ports and services, [`inbound`]
//! adapts HTTP onto the driving ports, and [`outbound`] implements the
//! driven ports over PostgreSQL, the filesystem, or memory.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;

//! Read-only access to registered profiles.

use async_trait::async_trait;

use crate::domain::{Profile, ProfileId, Role};

use super::define_port_error;

define_port_error! {
    /// Errors raised by profile repository adapters.
    pub enum ProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "profile repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "profile repository query failed: {message}",
    }
}

/// Profile lookups used by the session gate and dashboards.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch one profile; `None` when the id is unknown.
    async fn find_by_id(&self, id: &ProfileId) -> Result<Option<Profile>, ProfileRepositoryError>;

    /// Every profile holding `role`, oldest first.
    async fn list_by_role(&self, role: Role) -> Result<Vec<Profile>, ProfileRepositoryError>;

    /// Number of profiles holding `role`.
    async fn count_by_role(&self, role: Role) -> Result<u64, ProfileRepositoryError>;
}

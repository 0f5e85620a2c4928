//! Port for report persistence.
//!
//! Listings are always returned newest first and carry the owner's name and
//! class so views never need a second lookup per row.

use async_trait::async_trait;

use crate::domain::{Report, ReportDetail, ReportId, ReportQuery, ReportStatus, ReportSummary};

use super::define_port_error;

define_port_error! {
    /// Errors raised by report repository adapters.
    pub enum ReportRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "report repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "report repository query failed: {message}",
        /// The report's owner has no profile.
        MissingOwner { owner_id: String } => "report owner has no profile: {owner_id}",
    }
}

/// Report storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Persist a complete report in one write.
    async fn insert(&self, report: &Report) -> Result<(), ReportRepositoryError>;

    /// Rows matching `query`, newest submission first.
    async fn list(&self, query: &ReportQuery) -> Result<Vec<ReportSummary>, ReportRepositoryError>;

    /// One report with owner and photos; `None` when the id is unknown.
    async fn find_detail(&self, id: &ReportId)
    -> Result<Option<ReportDetail>, ReportRepositoryError>;

    /// Overwrite the status unconditionally. Returns `false` when the id is
    /// unknown.
    async fn update_status(
        &self,
        id: &ReportId,
        status: ReportStatus,
    ) -> Result<bool, ReportRepositoryError>;

    /// Number of rows matching `query`.
    async fn count(&self, query: &ReportQuery) -> Result<u64, ReportRepositoryError>;
}

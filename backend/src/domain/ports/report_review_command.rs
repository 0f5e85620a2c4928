//! Driving port for teachers changing a report's status.

use async_trait::async_trait;

use crate::domain::{Error, ReportId, ReportStatus};

/// Status overwrite used by the review page.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportReviewCommand: Send + Sync {
    /// Overwrite the status; any value may replace any other.
    async fn set_status(&self, id: &ReportId, status: ReportStatus) -> Result<(), Error>;
}

//! Driving port for report listings, details, and dashboards.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    DatePreset, Error, ProfileId, ReportDetail, ReportId, ReportSummary, StatusFilter,
    StudentDashboard, TeacherDashboard,
};

/// Time window requested by a list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSelection {
    /// A named preset resolved against the current time.
    Preset(DatePreset),
    /// Explicit inclusive bounds; a missing end means "now".
    Between {
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    },
}

impl Default for RangeSelection {
    fn default() -> Self {
        Self::Preset(DatePreset::All)
    }
}

/// Parameters of a report listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportListRequest {
    /// Restrict to one student's reports.
    pub owner: Option<ProfileId>,
    pub status: StatusFilter,
    pub range: RangeSelection,
}

/// Read side of reports.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportViewsQuery: Send + Sync {
    /// Filtered listing, newest first.
    async fn list_reports(&self, request: &ReportListRequest) -> Result<Vec<ReportSummary>, Error>;

    /// One report; not-found when the id is unknown.
    async fn report_detail(&self, id: &ReportId) -> Result<ReportDetail, Error>;

    async fn teacher_dashboard(&self) -> Result<TeacherDashboard, Error>;

    async fn student_dashboard(&self, owner: &ProfileId) -> Result<StudentDashboard, Error>;
}

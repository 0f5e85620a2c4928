//! Read side of reports plus the guru's status overwrite.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::FixedOffset;
use mockable::Clock;
use tracing::info;

use crate::domain::account_service::map_profile_error;
use crate::domain::ports::{
    ProfileRepository, RangeSelection, ReportListRequest, ReportRepository,
    ReportRepositoryError, ReportReviewCommand, ReportViewsQuery,
};
use crate::domain::report_filter::{DateRange, ReportFilter, filter_reports};
use crate::domain::{
    Error, ProfileId, ReportDetail, ReportId, ReportQuery, ReportStatus, ReportSummary, Role,
    StudentDashboard, TeacherDashboard,
};

/// Message shown when a report id matches nothing.
pub const REPORT_NOT_FOUND: &str = "Laporan tidak ditemukan";

pub(crate) fn map_report_error(error: ReportRepositoryError) -> Error {
    match error {
        ReportRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("report repository unavailable: {message}"))
        }
        ReportRepositoryError::Query { message } => {
            Error::internal(format!("report repository error: {message}"))
        }
        ReportRepositoryError::MissingOwner { owner_id } => {
            Error::internal(format!("report owner has no profile: {owner_id}"))
        }
    }
}

/// Report listings, details, dashboards, and status changes.
#[derive(Clone)]
pub struct ReportService<R, P> {
    reports: Arc<R>,
    profiles: Arc<P>,
    clock: Arc<dyn Clock>,
    school_offset: FixedOffset,
}

impl<R, P> ReportService<R, P> {
    /// `school_offset` is the UTC offset date presets are computed in.
    pub fn new(
        reports: Arc<R>,
        profiles: Arc<P>,
        clock: Arc<dyn Clock>,
        school_offset: FixedOffset,
    ) -> Self {
        Self {
            reports,
            profiles,
            clock,
            school_offset,
        }
    }

    fn resolve_range(&self, selection: RangeSelection) -> DateRange {
        let now = self.clock.utc();
        match selection {
            RangeSelection::Preset(preset) => preset.range(now, self.school_offset),
            RangeSelection::Between { from, to } => DateRange {
                start: from,
                end: to.unwrap_or(now),
            },
        }
    }
}

#[async_trait]
impl<R, P> ReportViewsQuery for ReportService<R, P>
where
    R: ReportRepository,
    P: ProfileRepository,
{
    async fn list_reports(&self, request: &ReportListRequest) -> Result<Vec<ReportSummary>, Error> {
        let query = ReportQuery {
            owner: request.owner.clone(),
            status: request.status.status(),
        };
        let rows = self
            .reports
            .list(&query)
            .await
            .map_err(map_report_error)?;
        let filter = ReportFilter {
            status: request.status,
            range: Some(self.resolve_range(request.range)),
        };
        Ok(filter_reports(rows, &filter))
    }

    async fn report_detail(&self, id: &ReportId) -> Result<ReportDetail, Error> {
        self.reports
            .find_detail(id)
            .await
            .map_err(map_report_error)?
            .ok_or_else(|| Error::not_found(REPORT_NOT_FOUND))
    }

    async fn teacher_dashboard(&self) -> Result<TeacherDashboard, Error> {
        let total_reports = self
            .reports
            .count(&ReportQuery::all())
            .await
            .map_err(map_report_error)?;
        let total_students = self
            .profiles
            .count_by_role(Role::Murid)
            .await
            .map_err(map_profile_error)?;
        Ok(TeacherDashboard {
            total_reports,
            total_students,
        })
    }

    async fn student_dashboard(&self, owner: &ProfileId) -> Result<StudentDashboard, Error> {
        let history = self
            .reports
            .list(&ReportQuery::owned_by(owner.clone()))
            .await
            .map_err(map_report_error)?;
        Ok(StudentDashboard::from_history(history))
    }
}

#[async_trait]
impl<R, P> ReportReviewCommand for ReportService<R, P>
where
    R: ReportRepository,
    P: ProfileRepository,
{
    async fn set_status(&self, id: &ReportId, status: ReportStatus) -> Result<(), Error> {
        let updated = self
            .reports
            .update_status(id, status)
            .await
            .map_err(map_report_error)?;
        if !updated {
            return Err(Error::not_found(REPORT_NOT_FOUND));
        }
        info!(report_id = %id, %status, "report status changed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "report_service_tests.rs"]
mod tests;

//! Dashboard read models for both roles.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{ReportId, ReportStatus, ReportSummary};

/// Headline numbers on the teacher dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherDashboard {
    pub total_reports: u64,
    pub total_students: u64,
}

/// Most recent submission of a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LatestReport {
    #[schema(value_type = String, format = Uuid)]
    pub id: ReportId,
    pub status: ReportStatus,
    pub submitted_at: DateTime<Utc>,
}

/// Student dashboard: totals, latest status, and full history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentDashboard {
    pub total_reports: u64,
    pub latest: Option<LatestReport>,
    /// Own reports, newest first.
    pub reports: Vec<ReportSummary>,
}

impl StudentDashboard {
    /// Build from a newest-first listing of the student's reports.
    pub fn from_history(reports: Vec<ReportSummary>) -> Self {
        let latest = reports.first().map(|report| LatestReport {
            id: report.id,
            status: report.status,
            submitted_at: report.submitted_at,
        });
        Self {
            total_reports: reports.len() as u64,
            latest,
            reports,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, ProfileId};
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    fn empty_history_has_no_latest() {
        let dashboard = StudentDashboard::from_history(Vec::new());
        assert_eq!(dashboard.total_reports, 0);
        assert!(dashboard.latest.is_none());
    }

    #[rstest]
    fn latest_is_first_row() {
        let owner = ProfileId::random();
        let row = |status, hour| ReportSummary {
            id: ReportId::random(),
            owner_id: owner.clone(),
            owner_name: DisplayName::new("Budi Santoso").expect("name"),
            owner_class: None,
            submitted_at: Utc
                .with_ymd_and_hms(2024, 3, 15, hour, 0, 0)
                .single()
                .expect("valid"),
            status,
        };
        let newest = row(ReportStatus::Ditolak, 9);
        let dashboard =
            StudentDashboard::from_history(vec![newest.clone(), row(ReportStatus::Diterima, 8)]);
        assert_eq!(dashboard.total_reports, 2);
        assert_eq!(
            dashboard.latest,
            Some(LatestReport {
                id: newest.id,
                status: ReportStatus::Ditolak,
                submitted_at: newest.submitted_at,
            })
        );
    }
}

//! In-process report store joined against [`MemoryAccounts`].

use std::cmp::Reverse;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::domain::ports::{ReportRepository, ReportRepositoryError};
use crate::domain::{
    Profile, Report, ReportDetail, ReportId, ReportQuery, ReportStatus, ReportSummary,
};

use super::MemoryAccounts;

const POISONED: &str = "report store lock poisoned";

/// Reports held in memory.
pub struct MemoryReports {
    accounts: Arc<MemoryAccounts>,
    reports: RwLock<Vec<Report>>,
}

impl MemoryReports {
    pub fn new(accounts: Arc<MemoryAccounts>) -> Self {
        Self {
            accounts,
            reports: RwLock::default(),
        }
    }

    fn owner(&self, report: &Report) -> Result<Profile, ReportRepositoryError> {
        self.accounts
            .profile(&report.owner_id)
            .ok_or_else(|| ReportRepositoryError::missing_owner(report.owner_id.as_ref()))
    }

    fn summarise(&self, report: &Report) -> Result<ReportSummary, ReportRepositoryError> {
        let owner = self.owner(report)?;
        Ok(ReportSummary {
            id: report.id,
            owner_id: report.owner_id.clone(),
            owner_name: owner.display_name().clone(),
            owner_class: owner.class_label().cloned(),
            submitted_at: report.submitted_at,
            status: report.status,
        })
    }

    fn matching(&self, query: &ReportQuery) -> Result<Vec<Report>, ReportRepositoryError> {
        let reports = self
            .reports
            .read()
            .map_err(|_| ReportRepositoryError::query(POISONED))?;
        Ok(reports
            .iter()
            .filter(|report| query.owner.as_ref().is_none_or(|owner| &report.owner_id == owner))
            .filter(|report| query.status.is_none_or(|status| report.status == status))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReportRepository for MemoryReports {
    async fn insert(&self, report: &Report) -> Result<(), ReportRepositoryError> {
        self.owner(report)?;
        let mut reports = self
            .reports
            .write()
            .map_err(|_| ReportRepositoryError::query(POISONED))?;
        if reports.iter().any(|existing| existing.id == report.id) {
            return Err(ReportRepositoryError::query(format!(
                "duplicate report id {}",
                report.id
            )));
        }
        reports.push(report.clone());
        Ok(())
    }

    async fn list(&self, query: &ReportQuery) -> Result<Vec<ReportSummary>, ReportRepositoryError> {
        let mut rows = self.matching(query)?;
        rows.sort_by_key(|report| Reverse((report.submitted_at, *report.id.as_uuid())));
        rows.iter().map(|report| self.summarise(report)).collect()
    }

    async fn find_detail(
        &self,
        id: &ReportId,
    ) -> Result<Option<ReportDetail>, ReportRepositoryError> {
        let found = {
            let reports = self
                .reports
                .read()
                .map_err(|_| ReportRepositoryError::query(POISONED))?;
            reports.iter().find(|report| &report.id == id).cloned()
        };
        found
            .map(|report| {
                Ok(ReportDetail {
                    summary: self.summarise(&report)?,
                    photos: report.photos,
                })
            })
            .transpose()
    }

    async fn update_status(
        &self,
        id: &ReportId,
        status: ReportStatus,
    ) -> Result<bool, ReportRepositoryError> {
        let mut reports = self
            .reports
            .write()
            .map_err(|_| ReportRepositoryError::query(POISONED))?;
        match reports.iter_mut().find(|report| &report.id == id) {
            Some(report) => {
                report.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self, query: &ReportQuery) -> Result<u64, ReportRepositoryError> {
        Ok(self.matching(query)?.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::IdentityProvider;
    use crate::domain::{PhotoPair, PhotoSet, ProfileId, Registration, RegistrationInput};
    use chrono::{DateTime, TimeZone, Utc};
    use rstest::rstest;

    struct Fixture {
        reports: MemoryReports,
        owner: ProfileId,
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, hour, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn report(owner: &ProfileId, hour: u32) -> Report {
        Report {
            id: ReportId::random(),
            owner_id: owner.clone(),
            submitted_at: at(hour),
            status: ReportStatus::INITIAL,
            photos: PhotoSet::from_fn(|category| PhotoPair {
                before: format!("https://files.test/{}_before.jpg", category.key()),
                after: format!("https://files.test/{}_after.jpg", category.key()),
            }),
        }
    }

    async fn seeded() -> Fixture {
        let accounts = Arc::new(MemoryAccounts::new());
        let registration = Registration::try_from_input(RegistrationInput {
            email: "budi@sekolah.id",
            password: "rahasia",
            display_name: "Budi Santoso",
            role: "MURID",
            class_label: Some("XI TKJ 2"),
        })
        .expect("valid registration");
        let profile = accounts
            .sign_up(&registration, Utc::now())
            .await
            .expect("sign up");
        Fixture {
            reports: MemoryReports::new(accounts),
            owner: profile.id().clone(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn lists_newest_first_with_owner_details() {
        let Fixture { reports, owner } = seeded().await;
        for hour in [1, 5, 3] {
            reports.insert(&report(&owner, hour)).await.expect("insert");
        }

        let rows = reports.list(&ReportQuery::all()).await.expect("list");
        let hours: Vec<_> = rows.iter().map(|row| row.submitted_at).collect();
        assert_eq!(hours, [at(5), at(3), at(1)]);
        assert_eq!(rows[0].owner_name.as_ref(), "Budi Santoso");
        assert_eq!(
            rows[0].owner_class.as_ref().map(ToString::to_string),
            Some("XI TKJ 2".to_owned())
        );
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_owner_is_refused() {
        let Fixture { reports, .. } = seeded().await;
        let error = reports
            .insert(&report(&ProfileId::random(), 1))
            .await
            .expect_err("no owner");
        assert!(matches!(error, ReportRepositoryError::MissingOwner { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn status_overwrite_applies_in_any_direction() {
        let Fixture { reports, owner } = seeded().await;
        let stored = report(&owner, 1);
        reports.insert(&stored).await.expect("insert");

        for status in [
            ReportStatus::Ditolak,
            ReportStatus::Diterima,
            ReportStatus::Diproses,
            ReportStatus::Diproses,
        ] {
            assert!(reports.update_status(&stored.id, status).await.expect("update"));
            let detail = reports
                .find_detail(&stored.id)
                .await
                .expect("detail")
                .expect("present");
            assert_eq!(detail.summary.status, status);
            assert_eq!(detail.photos, stored.photos);
        }
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_id_updates_nothing() {
        let Fixture { reports, .. } = seeded().await;
        let updated = reports
            .update_status(&ReportId::random(), ReportStatus::Diterima)
            .await
            .expect("update");
        assert!(!updated);
    }

    #[rstest]
    #[tokio::test]
    async fn count_honours_owner_and_status() {
        let Fixture { reports, owner } = seeded().await;
        let first = report(&owner, 1);
        reports.insert(&first).await.expect("insert");
        reports.insert(&report(&owner, 2)).await.expect("insert");
        reports
            .update_status(&first.id, ReportStatus::Diterima)
            .await
            .expect("update");

        let accepted =
            ReportQuery::owned_by(owner.clone()).with_status(Some(ReportStatus::Diterima));
        assert_eq!(reports.count(&accepted).await.expect("count"), 1);
        assert_eq!(reports.count(&ReportQuery::owned_by(owner)).await.expect("count"), 2);
        assert_eq!(
            reports
                .count(&ReportQuery::owned_by(ProfileId::random()))
                .await
                .expect("count"),
            0
        );
    }
}

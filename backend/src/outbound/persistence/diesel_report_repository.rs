//! PostgreSQL-backed `ReportRepository`.
//!
//! Listings join `profiles` so each row carries the owner's name and class.
//! Ordering is `submitted_at DESC, id DESC` so equal timestamps stay stable.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ReportRepository, ReportRepositoryError};
use crate::domain::{Report, ReportDetail, ReportId, ReportQuery, ReportStatus, ReportSummary};

use super::diesel_basic_error_mapping::{
    is_foreign_key_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewReportRow, ProfileRow, ReportRow};
use super::pool::{DbPool, PoolError};
use super::schema::{profiles, reports};

/// Diesel-backed report storage.
#[derive(Clone)]
pub struct DieselReportRepository {
    pool: DbPool,
}

impl DieselReportRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReportRepositoryError {
    map_basic_pool_error(error, ReportRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ReportRepositoryError {
    map_basic_diesel_error(
        error,
        ReportRepositoryError::query,
        ReportRepositoryError::connection,
    )
}

fn summarise(
    report: &ReportRow,
    owner: &ProfileRow,
) -> Result<ReportSummary, ReportRepositoryError> {
    report.summarise(owner).map_err(ReportRepositoryError::query)
}

/// Report rows narrowed by owner and status, without the profile join.
fn filtered(query: &ReportQuery) -> reports::BoxedQuery<'static, Pg> {
    let mut boxed = reports::table.into_boxed();
    if let Some(owner) = &query.owner {
        boxed = boxed.filter(reports::owner_id.eq(*owner.as_uuid()));
    }
    if let Some(status) = query.status {
        boxed = boxed.filter(reports::status.eq(status.as_str()));
    }
    boxed
}

#[async_trait]
impl ReportRepository for DieselReportRepository {
    async fn insert(&self, report: &Report) -> Result<(), ReportRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(reports::table)
            .values(&NewReportRow::from(report))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|error| {
                if is_foreign_key_violation(&error) {
                    ReportRepositoryError::missing_owner(report.owner_id.as_ref())
                } else {
                    map_diesel_error(error)
                }
            })
    }

    async fn list(&self, query: &ReportQuery) -> Result<Vec<ReportSummary>, ReportRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut joined = reports::table
            .inner_join(profiles::table)
            .select((ReportRow::as_select(), ProfileRow::as_select()))
            .into_boxed();
        if let Some(owner) = &query.owner {
            joined = joined.filter(reports::owner_id.eq(*owner.as_uuid()));
        }
        if let Some(status) = query.status {
            joined = joined.filter(reports::status.eq(status.as_str()));
        }
        let rows: Vec<(ReportRow, ProfileRow)> = joined
            .order((reports::submitted_at.desc(), reports::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.iter()
            .map(|(report, owner)| summarise(report, owner))
            .collect()
    }

    async fn find_detail(
        &self,
        id: &ReportId,
    ) -> Result<Option<ReportDetail>, ReportRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<(ReportRow, ProfileRow)> = reports::table
            .inner_join(profiles::table)
            .filter(reports::id.eq(*id.as_uuid()))
            .select((ReportRow::as_select(), ProfileRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|(report, owner)| {
            Ok(ReportDetail {
                summary: summarise(&report, &owner)?,
                photos: report.photos(),
            })
        })
        .transpose()
    }

    async fn update_status(
        &self,
        id: &ReportId,
        status: ReportStatus,
    ) -> Result<bool, ReportRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(reports::table.find(*id.as_uuid()))
            .set(reports::status.eq(status.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn count(&self, query: &ReportQuery) -> Result<u64, ReportRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = filtered(query)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        u64::try_from(count).map_err(|err| ReportRepositoryError::query(err.to_string()))
    }
}

//! The submission pipeline: validate, upload sequentially, then record.
//!
//! ```text
//! COLLECTING -> VALIDATING -> UPLOADING -> PERSISTING -> DONE
//!                   |             |             |
//!                   +-------------+-------------+--> FAILED
//! ```
//!
//! Photos are uploaded one at a time in category order, before then after.
//! The first failure stops the pipeline. Photos stored before the failure
//! stay where they are and are reported as orphaned; nothing is rolled back
//! and nothing is retried.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    ObjectPath, ObjectPayload, ObjectStore, ObjectStoreError, ReportRepository,
    ReportSubmissionCommand, photo_content_type,
};
use crate::domain::report_service::map_report_error;
use crate::domain::submission::{incomplete_submission_error, storage_path};
use crate::domain::{
    Category, Error, PhotoLocations, PhotoSide, ProfileId, Report, ReportId, ReportStatus, Role,
    StagedPhoto, SubmissionDraft, SubmissionFailure, SubmissionPhase, SubmissionReceipt,
};

/// Runs submissions against a photo store and a report repository.
#[derive(Clone)]
pub struct SubmissionService<S, R> {
    store: Arc<S>,
    reports: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<S, R> SubmissionService<S, R> {
    pub fn new(store: Arc<S>, reports: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            reports,
            clock,
        }
    }
}

pub(crate) fn map_store_error(error: ObjectStoreError) -> Error {
    match error {
        ObjectStoreError::AlreadyExists { .. } => Error::conflict(error.to_string()),
        other => Error::service_unavailable(other.to_string()),
    }
}

/// Failure bookkeeping for one pipeline run.
struct Run {
    orphaned: Vec<ObjectPath>,
}

impl Run {
    fn fail(self, phase: SubmissionPhase, error: Error) -> SubmissionFailure {
        if !self.orphaned.is_empty() {
            let paths: Vec<&str> = self.orphaned.iter().map(ObjectPath::as_str).collect();
            warn!(
                %phase,
                orphaned = ?paths,
                count = paths.len(),
                "submission aborted; stored photos left in place"
            );
        }
        SubmissionFailure {
            phase,
            error,
            orphaned: self.orphaned,
            draft: None,
        }
    }
}

impl<S, R> SubmissionService<S, R>
where
    S: ObjectStore,
    R: ReportRepository,
{
    async fn upload(
        &self,
        owner: &ProfileId,
        timestamp_millis: i64,
        category: Category,
        side: PhotoSide,
        photo: StagedPhoto,
        run: &mut Run,
    ) -> Result<String, Error> {
        let path = storage_path(owner, timestamp_millis, category, side, &photo.file_name)
            .map_err(|err| Error::invalid_request(format!("invalid photo path: {err}")))?;
        let content_type =
            photo_content_type(photo.content_type.as_deref(), photo.file_name.as_ref()).to_owned();
        let stored = self
            .store
            .put(
                &path,
                ObjectPayload {
                    content_type,
                    bytes: photo.bytes,
                },
            )
            .await
            .map_err(map_store_error)?;
        debug!(path = %stored.path, size = stored.size, "photo stored");
        run.orphaned.push(path);
        self.store.public_url(&stored).map_err(map_store_error)
    }
}

#[async_trait]
impl<S, R> ReportSubmissionCommand for SubmissionService<S, R>
where
    S: ObjectStore,
    R: ReportRepository,
{
    async fn submit(
        &self,
        owner: &ProfileId,
        draft: SubmissionDraft,
    ) -> Result<SubmissionReceipt, SubmissionFailure> {
        let photos = match draft.into_complete() {
            Ok(photos) => photos,
            Err((draft, category)) => {
                debug!(%owner, %category, "submission rejected: missing photo");
                return Err(SubmissionFailure {
                    phase: SubmissionPhase::Validating,
                    error: incomplete_submission_error(category),
                    orphaned: Vec::new(),
                    draft: Some(draft),
                });
            }
        };

        let submitted_at = self.clock.utc();
        let timestamp_millis = submitted_at.timestamp_millis();
        let mut run = Run {
            orphaned: Vec::with_capacity(10),
        };
        let mut locations = PhotoLocations::default();
        for (category, pair) in photos.into_entries() {
            for (side, photo) in pair.into_entries() {
                match self
                    .upload(owner, timestamp_millis, category, side, photo, &mut run)
                    .await
                {
                    Ok(url) => *locations.get_mut(category).get_mut(side) = url,
                    Err(error) => return Err(run.fail(SubmissionPhase::Uploading, error)),
                }
            }
        }

        let report = Report {
            id: ReportId::random(),
            owner_id: owner.clone(),
            submitted_at,
            status: ReportStatus::INITIAL,
            photos: locations,
        };
        if let Err(error) = self.reports.insert(&report).await {
            return Err(run.fail(SubmissionPhase::Persisting, map_report_error(error)));
        }

        info!(report_id = %report.id, %owner, "report submitted");
        Ok(SubmissionReceipt {
            report,
            redirect_to: Role::Murid.dashboard_path(),
        })
    }
}

#[cfg(test)]
#[path = "submission_service_tests.rs"]
mod tests;

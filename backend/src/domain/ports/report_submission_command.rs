//! Driving port for submitting a report.

use async_trait::async_trait;

use crate::domain::{ProfileId, SubmissionDraft, SubmissionFailure, SubmissionReceipt};

/// Runs the submission pipeline for one student.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportSubmissionCommand: Send + Sync {
    /// Validate, upload, and record `draft` on behalf of `owner`.
    async fn submit(
        &self,
        owner: &ProfileId,
        draft: SubmissionDraft,
    ) -> Result<SubmissionReceipt, SubmissionFailure>;
}

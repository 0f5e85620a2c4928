//! Report endpoints: student submission and listings, teacher review.
//!
//! ```text
//! POST  /api/v1/reports                       (MURID)
//! GET   /api/v1/murid/reports?status=&range=  (MURID, own reports)
//! GET   /api/v1/guru/reports?status=&range=   (GURU, all reports)
//! GET   /api/v1/guru/reports/{id}             (GURU)
//! PATCH /api/v1/guru/reports/{id}/status      (GURU)
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use base64::prelude::{BASE64_STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::ports::{RangeSelection, ReportListRequest};
use crate::domain::{
    Category, Error, PhotoFileName, PhotoLocations, PhotoSide, ProfileId, REPORT_NOT_FOUND,
    ReportDetail, ReportId, ReportStatus, ReportSummary, Role, StagedPhoto, StatusFilter,
    SubmissionDraft, SubmissionReceipt,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::guard::require_role;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, conflicting_range_error, invalid_filter_error, invalid_photo_error,
    parse_optional_rfc3339_timestamp,
};

const STATUS: FieldName = FieldName::new("status");
const RANGE: FieldName = FieldName::new("range");
const FROM: FieldName = FieldName::new("from");
const TO: FieldName = FieldName::new("to");

/// One photo chosen for a slot.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhotoUpload {
    /// Original file name, kept as the tail of the storage path.
    #[schema(example = "meja_kerja.jpg")]
    pub file_name: String,
    /// Media type reported by the browser; guessed from the extension when
    /// absent.
    #[schema(example = "image/jpeg")]
    pub content_type: Option<String>,
    /// Standard base64 of the file contents.
    pub data: String,
}

/// Before and after slots of one category. Empty slots are `null` or absent.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct PhotoPairUpload {
    pub before: Option<PhotoUpload>,
    pub after: Option<PhotoUpload>,
}

/// Submission body: one optional pair per 5R category.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct SubmitReportRequest {
    pub ringkas: Option<PhotoPairUpload>,
    pub rapi: Option<PhotoPairUpload>,
    pub resik: Option<PhotoPairUpload>,
    pub rawat: Option<PhotoPairUpload>,
    pub rajin: Option<PhotoPairUpload>,
}

impl SubmitReportRequest {
    fn into_pairs(self) -> [(Category, Option<PhotoPairUpload>); 5] {
        [
            (Category::Ringkas, self.ringkas),
            (Category::Rapi, self.rapi),
            (Category::Resik, self.resik),
            (Category::Rawat, self.rawat),
            (Category::Rajin, self.rajin),
        ]
    }
}

fn staged_photo(category: Category, side: PhotoSide, upload: PhotoUpload) -> Result<StagedPhoto, Error> {
    let file_name = PhotoFileName::new(upload.file_name)
        .map_err(|err| invalid_photo_error(category, side, false, err))?;
    let bytes = BASE64_STANDARD
        .decode(upload.data.as_bytes())
        .map_err(|err| invalid_photo_error(category, side, true, err))?;
    Ok(StagedPhoto {
        file_name,
        content_type: upload.content_type.filter(|value| !value.trim().is_empty()),
        bytes,
    })
}

impl TryFrom<SubmitReportRequest> for SubmissionDraft {
    type Error = Error;

    fn try_from(request: SubmitReportRequest) -> Result<Self, Self::Error> {
        let mut draft = SubmissionDraft::new();
        for (category, pair) in request.into_pairs() {
            let pair = pair.unwrap_or_default();
            for (side, upload) in [(PhotoSide::Before, pair.before), (PhotoSide::After, pair.after)] {
                if let Some(upload) = upload {
                    draft.stage(category, side, staged_photo(category, side, upload)?);
                }
            }
        }
        Ok(draft)
    }
}

/// Created report and the page the student lands on.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReportResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: ReportId,
    pub status: ReportStatus,
    pub submitted_at: DateTime<Utc>,
    /// Category key to `{ before, after }` public URLs.
    #[schema(value_type = Object)]
    pub photos: PhotoLocations,
    #[schema(example = "/murid/dashboard")]
    pub redirect: String,
}

impl From<SubmissionReceipt> for SubmitReportResponse {
    fn from(receipt: SubmissionReceipt) -> Self {
        let SubmissionReceipt { report, redirect_to } = receipt;
        Self {
            id: report.id,
            status: report.status,
            submitted_at: report.submitted_at,
            photos: report.photos,
            redirect: redirect_to.to_owned(),
        }
    }
}

/// Submit the ten photos of a lab report.
#[utoipa::path(
    post,
    path = "/api/v1/reports",
    request_body = SubmitReportRequest,
    responses(
        (status = 201, description = "Report recorded", body = SubmitReportResponse),
        (status = 400, description = "Missing or unreadable photo", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Not a student", body = ErrorSchema),
        (status = 503, description = "Photo storage or database unavailable", body = ErrorSchema)
    ),
    tags = ["reports"],
    operation_id = "submitReport",
    security(("SessionCookie" = []))
)]
#[post("/reports")]
pub async fn submit_report(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SubmitReportRequest>,
) -> ApiResult<HttpResponse> {
    let owner = require_role(&session, state.accounts.as_ref(), Role::Murid).await?;
    let draft = SubmissionDraft::try_from(payload.into_inner())?;
    let receipt = state
        .submissions
        .submit(owner.id(), draft)
        .await
        .map_err(|failure| {
            debug!(
                phase = %failure.phase,
                orphaned = failure.orphaned.len(),
                "submission did not complete"
            );
            failure.error
        })?;
    Ok(HttpResponse::Created().json(SubmitReportResponse::from(receipt)))
}

/// Listing filters shared by both roles.
#[derive(Debug, Default, Deserialize)]
pub struct ReportListQuery {
    pub status: Option<String>,
    pub range: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl ReportListQuery {
    fn into_request(self, owner: Option<ProfileId>) -> Result<ReportListRequest, Error> {
        let status = self
            .status
            .as_deref()
            .map(str::parse::<StatusFilter>)
            .transpose()
            .map_err(|err| invalid_filter_error(STATUS, &err))?
            .unwrap_or_default();
        let from = parse_optional_rfc3339_timestamp(self.from, FROM)?;
        let to = parse_optional_rfc3339_timestamp(self.to, TO)?;
        let range = match (self.range, from, to) {
            (None, None, None) => RangeSelection::default(),
            (Some(raw), None, None) => RangeSelection::Preset(
                raw.parse().map_err(|err| invalid_filter_error(RANGE, &err))?,
            ),
            (None, from, to) => RangeSelection::Between { from, to },
            (Some(_), _, _) => return Err(conflicting_range_error()),
        };
        Ok(ReportListRequest {
            owner,
            status,
            range,
        })
    }
}

/// The caller's own reports, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/murid/reports",
    params(
        ("status" = Option<String>, Query, description = "DIPROSES, DITERIMA, DITOLAK, or semua"),
        ("range" = Option<String>, Query, description = "hari, minggu, bulan, tahun, or semua"),
        ("from" = Option<String>, Query, description = "Inclusive RFC 3339 lower bound"),
        ("to" = Option<String>, Query, description = "Inclusive RFC 3339 upper bound, default now")
    ),
    responses(
        (status = 200, description = "Own reports", body = [ReportSummary]),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Not a student", body = ErrorSchema)
    ),
    tags = ["reports"],
    operation_id = "listOwnReports",
    security(("SessionCookie" = []))
)]
#[get("/murid/reports")]
pub async fn list_own_reports(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ReportListQuery>,
) -> ApiResult<web::Json<Vec<ReportSummary>>> {
    let owner = require_role(&session, state.accounts.as_ref(), Role::Murid).await?;
    let request = query.into_inner().into_request(Some(owner.id().clone()))?;
    Ok(web::Json(state.views.list_reports(&request).await?))
}

/// Every report in the school with its owner's name and class.
#[utoipa::path(
    get,
    path = "/api/v1/guru/reports",
    params(
        ("status" = Option<String>, Query, description = "DIPROSES, DITERIMA, DITOLAK, or semua"),
        ("range" = Option<String>, Query, description = "hari, minggu, bulan, tahun, or semua"),
        ("from" = Option<String>, Query, description = "Inclusive RFC 3339 lower bound"),
        ("to" = Option<String>, Query, description = "Inclusive RFC 3339 upper bound, default now")
    ),
    responses(
        (status = 200, description = "All reports", body = [ReportSummary]),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Not a teacher", body = ErrorSchema)
    ),
    tags = ["reports"],
    operation_id = "listAllReports",
    security(("SessionCookie" = []))
)]
#[get("/guru/reports")]
pub async fn list_all_reports(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ReportListQuery>,
) -> ApiResult<web::Json<Vec<ReportSummary>>> {
    require_role(&session, state.accounts.as_ref(), Role::Guru).await?;
    let request = query.into_inner().into_request(None)?;
    Ok(web::Json(state.views.list_reports(&request).await?))
}

// Any id that does not parse cannot name a report.
fn report_id(raw: &str) -> Result<ReportId, Error> {
    ReportId::new(raw).map_err(|_| Error::not_found(REPORT_NOT_FOUND))
}

/// One report with owner details and all ten photos.
#[utoipa::path(
    get,
    path = "/api/v1/guru/reports/{id}",
    params(("id" = String, Path, description = "Report id")),
    responses(
        (status = 200, description = "Report detail", body = ReportDetail),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Not a teacher", body = ErrorSchema),
        (status = 404, description = "Unknown report", body = ErrorSchema)
    ),
    tags = ["reports"],
    operation_id = "getReport",
    security(("SessionCookie" = []))
)]
#[get("/guru/reports/{id}")]
pub async fn report_detail(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ReportDetail>> {
    require_role(&session, state.accounts.as_ref(), Role::Guru).await?;
    let id = report_id(&path)?;
    Ok(web::Json(state.views.report_detail(&id).await?))
}

/// New status for a report.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct StatusUpdateRequest {
    pub status: ReportStatus,
}

/// Status now stored for the report.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusUpdateResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: ReportId,
    pub status: ReportStatus,
}

/// Overwrite a report's status. Any value may replace any other.
#[utoipa::path(
    patch,
    path = "/api/v1/guru/reports/{id}/status",
    params(("id" = String, Path, description = "Report id")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Status stored", body = StatusUpdateResponse),
        (status = 400, description = "Unknown status", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Not a teacher", body = ErrorSchema),
        (status = 404, description = "Unknown report", body = ErrorSchema)
    ),
    tags = ["reports"],
    operation_id = "updateReportStatus",
    security(("SessionCookie" = []))
)]
#[patch("/guru/reports/{id}/status")]
pub async fn update_report_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<StatusUpdateRequest>,
) -> ApiResult<web::Json<StatusUpdateResponse>> {
    require_role(&session, state.accounts.as_ref(), Role::Guru).await?;
    let id = report_id(&path)?;
    let status = payload.into_inner().status;
    state.reviews.set_status(&id, status).await?;
    Ok(web::Json(StatusUpdateResponse { id, status }))
}

#[cfg(test)]
#[path = "reports_tests.rs"]
mod tests;

//! OpenAPI schema definitions for domain types that stay free of `utoipa`.
//!
//! The wrappers mirror the JSON shape of their domain counterparts but live
//! in the inbound adapter layer where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Not signed in, or the session no longer has a profile.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Signed in with the wrong role.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request collides with existing state, such as a taken email.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing store could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Message meant to be shown to the user as is.
    #[schema(example = "Mohon lengkapi foto Before dan After untuk Ringkas")]
    message: String,
    /// Correlation identifier matching the `trace-id` response header.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details: `fields` for form errors, `redirect` for
    /// gate failures, `category` for incomplete submissions.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Navigation`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Navigation)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct NavigationSchema {
    /// `render`, `loading`, `redirect`, or `not_found`.
    #[schema(example = "redirect")]
    outcome: String,
    /// Page to render when `outcome` is `render`.
    #[schema(example = "guru_reports")]
    page: Option<String>,
    /// Target path when `outcome` is `redirect`.
    #[schema(example = "/murid/dashboard")]
    location: Option<String>,
}

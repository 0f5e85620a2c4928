//! OpenAPI documentation for the REST API.
//!
//! Registers every handler below `/api/v1`, the storage and health routes,
//! the request/response bodies, and the session cookie security scheme.
//! Swagger UI serves the document in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Category, LatestReport, Profile, ReportDetail, ReportStatus, ReportSummary, Role,
    StudentDashboard, TeacherDashboard,
};
use crate::inbound::http::auth::{LoginRequest, LoginResponse, RegisterRequest};
use crate::inbound::http::reports::{
    PhotoPairUpload, PhotoUpload, StatusUpdateRequest, StatusUpdateResponse, SubmitReportRequest,
    SubmitReportResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, NavigationSchema};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "5R lab report API",
        description = "Students submit before/after photos for the five 5R categories; teachers review them.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::me,
        crate::inbound::http::navigation::resolve_navigation,
        crate::inbound::http::dashboard::student_dashboard,
        crate::inbound::http::dashboard::teacher_dashboard,
        crate::inbound::http::reports::submit_report,
        crate::inbound::http::reports::list_own_reports,
        crate::inbound::http::reports::list_all_reports,
        crate::inbound::http::reports::report_detail,
        crate::inbound::http::reports::update_report_status,
        crate::inbound::http::storage::serve_photo,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        NavigationSchema,
        Profile,
        Role,
        Category,
        ReportStatus,
        ReportSummary,
        ReportDetail,
        LatestReport,
        StudentDashboard,
        TeacherDashboard,
        RegisterRequest,
        LoginRequest,
        LoginResponse,
        PhotoUpload,
        PhotoPairUpload,
        SubmitReportRequest,
        SubmitReportResponse,
        StatusUpdateRequest,
        StatusUpdateResponse,
    )),
    tags(
        (name = "auth", description = "Registration, sign-in, and the current profile"),
        (name = "reports", description = "Lab report submission and review"),
        (name = "dashboard", description = "Per-role summaries"),
        (name = "navigation", description = "Route gating for the browser"),
        (name = "storage", description = "Stored photos"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in aliased schema names.
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn error_schema_uses_wire_names() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        for field in ["code", "message", "traceId", "details"] {
            assert_object_schema_has_field(error_schema, field);
        }
    }

    #[rstest]
    fn summary_schema_is_camel_case() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let summary = schemas.get("ReportSummary").expect("ReportSummary schema");

        for field in ["ownerName", "ownerClass", "submittedAt", "status"] {
            assert_object_schema_has_field(summary, field);
        }
    }

    #[rstest]
    #[case("/api/v1/auth/login")]
    #[case("/api/v1/reports")]
    #[case("/api/v1/guru/reports/{id}/status")]
    #[case("/api/v1/navigation")]
    #[case("/storage/{path}")]
    #[case("/health/ready")]
    fn documents_route(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn registers_session_cookie_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}

//! Dashboard endpoints for both roles.

use actix_web::{get, web};

use crate::domain::{Role, StudentDashboard, TeacherDashboard};
use crate::inbound::http::ApiResult;
use crate::inbound::http::guard::require_role;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Own report count, latest status, and history.
#[utoipa::path(
    get,
    path = "/api/v1/murid/dashboard",
    responses(
        (status = 200, description = "Student dashboard", body = StudentDashboard),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Not a student", body = ErrorSchema)
    ),
    tags = ["dashboard"],
    operation_id = "studentDashboard",
    security(("SessionCookie" = []))
)]
#[get("/murid/dashboard")]
pub async fn student_dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<StudentDashboard>> {
    let owner = require_role(&session, state.accounts.as_ref(), Role::Murid).await?;
    Ok(web::Json(state.views.student_dashboard(owner.id()).await?))
}

/// School-wide report and student totals.
#[utoipa::path(
    get,
    path = "/api/v1/guru/dashboard",
    responses(
        (status = 200, description = "Teacher dashboard", body = TeacherDashboard),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Not a teacher", body = ErrorSchema),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["dashboard"],
    operation_id = "teacherDashboard",
    security(("SessionCookie" = []))
)]
#[get("/guru/dashboard")]
pub async fn teacher_dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<TeacherDashboard>> {
    require_role(&session, state.accounts.as_ref(), Role::Guru).await?;
    Ok(web::Json(state.views.teacher_dashboard().await?))
}

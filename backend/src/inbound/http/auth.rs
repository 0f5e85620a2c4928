//! Account endpoints.
//!
//! ```text
//! POST /api/v1/auth/register {"email":"siti@sekolah.id","password":"rahasia",...}
//! POST /api/v1/auth/login    {"email":"siti@sekolah.id","password":"rahasia"}
//! POST /api/v1/auth/logout
//! GET  /api/v1/auth/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{LoginCredentials, Profile, Registration, RegistrationInput};
use crate::inbound::http::ApiResult;
use crate::inbound::http::guard::{current_profile, login_required};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::field_errors;

/// Registration form body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "siti@sekolah.id")]
    pub email: String,
    #[schema(example = "rahasia")]
    pub password: String,
    #[schema(example = "Siti Rahmawati")]
    pub display_name: String,
    /// `GURU` or `MURID`.
    #[schema(example = "MURID")]
    pub role: String,
    /// Required for `MURID`, ignored for `GURU`.
    #[schema(example = "XI TKJ 2")]
    pub class_label: Option<String>,
}

/// Sign-in body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "siti@sekolah.id")]
    pub email: String,
    #[schema(example = "rahasia")]
    pub password: String,
}

/// Signed-in profile and where the browser should go next.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub profile: Profile,
    #[schema(example = "/murid/dashboard")]
    pub redirect: String,
}

/// Create an account. The caller stays signed out.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = Profile),
        (status = 400, description = "Invalid form fields", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Account store unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let registration = Registration::try_from_input(RegistrationInput {
        email: &body.email,
        password: &body.password,
        display_name: &body.display_name,
        role: &body.role,
        class_label: body.class_label.as_deref(),
    })
    .map_err(|errors| field_errors(&errors))?;
    let profile = state.accounts.register(&registration).await?;
    Ok(HttpResponse::Created().json(profile))
}

/// Check credentials and establish the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid form fields", body = ErrorSchema),
        (status = 401, description = "Wrong email or password", body = ErrorSchema),
        (status = 503, description = "Account store unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(|errors| field_errors(&errors))?;
    let profile = state.accounts.login(&credentials).await?;
    session.persist_profile(profile.id())?;
    info!(profile_id = %profile.id(), role = %profile.role(), "signed in");
    Ok(web::Json(LoginResponse {
        redirect: profile.role().dashboard_path().to_owned(),
        profile,
    }))
}

/// Drop the session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["auth"],
    operation_id = "logout",
    security(("SessionCookie" = []))
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// Profile of the signed-in caller.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current profile", body = Profile),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentProfile",
    security(("SessionCookie" = []))
)]
#[get("/auth/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Profile>> {
    current_profile(&session, state.accounts.as_ref())
        .await?
        .map(web::Json)
        .ok_or_else(login_required)
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;

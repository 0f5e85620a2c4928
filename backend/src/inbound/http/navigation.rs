//! Server-side evaluation of the browser route table.
//!
//! The front end asks where a path leads for the current session before it
//! renders anything, so the role gate is decided in one place.

use actix_web::{get, web};
use serde::Deserialize;

use crate::domain::{Navigation, navigate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::guard::session_state;
use crate::inbound::http::schemas::{ErrorSchema, NavigationSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Deserialize)]
pub struct NavigationQuery {
    pub path: String,
}

/// Decide what the browser shows for `path`.
#[utoipa::path(
    get,
    path = "/api/v1/navigation",
    params(("path" = String, Query, description = "Browser path, e.g. /guru/laporan")),
    responses(
        (status = 200, description = "Render, redirect, or not found", body = NavigationSchema),
        (status = 400, description = "Missing path", body = ErrorSchema)
    ),
    tags = ["navigation"],
    operation_id = "navigate",
    security([])
)]
#[get("/navigation")]
pub async fn resolve_navigation(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<NavigationQuery>,
) -> ApiResult<web::Json<Navigation>> {
    let session = session_state(&session, state.accounts.as_ref()).await?;
    Ok(web::Json(navigate(&query.path, session)))
}

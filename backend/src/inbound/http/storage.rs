//! Serves stored photos at the public URLs handed out on submission.

use actix_web::http::header;
use actix_web::{HttpResponse, get, web};
use tracing::debug;

use crate::domain::Error;
use crate::domain::ports::ObjectPath;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

const PHOTO_NOT_FOUND: &str = "Foto tidak ditemukan";

/// Fetch one stored photo. Objects never change once written.
#[utoipa::path(
    get,
    path = "/storage/{path}",
    params(("path" = String, Path, description = "Object path below the storage root")),
    responses(
        (status = 200, description = "Photo bytes", content_type = "image/*"),
        (status = 404, description = "No such photo", body = ErrorSchema),
        (status = 503, description = "Photo storage unavailable", body = ErrorSchema)
    ),
    tags = ["storage"],
    operation_id = "getPhoto",
    security([])
)]
#[get("/storage/{path:.*}")]
pub async fn serve_photo(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let path = ObjectPath::new(path.into_inner()).map_err(|err| {
        debug!(error = %err, "rejected storage path");
        Error::not_found(PHOTO_NOT_FOUND)
    })?;
    let blob = state
        .photos
        .get(&path)
        .await
        .map_err(|err| Error::service_unavailable(err.to_string()))?
        .ok_or_else(|| Error::not_found(PHOTO_NOT_FOUND))?;
    Ok(HttpResponse::Ok()
        .content_type(blob.content_type)
        .insert_header((header::CACHE_CONTROL, "public, max-age=31536000, immutable"))
        .insert_header((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .body(blob.bytes))
}

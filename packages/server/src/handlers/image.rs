use axum::Json;
use axum::extract::{Path, State};
use tracing::instrument;
use uuid::Uuid;

use super::achievement::validate_image_url;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::gallery;
use crate::models::cat::ImageResponse;
use crate::models::gallery::ImageMetadataRequest;
use crate::state::AppState;

const MAX_TITLE_CHARS: usize = 256;
const MAX_DESCRIPTION_CHARS: usize = 4096;

#[utoipa::path(
    put,
    path = "/{id}/primary",
    tag = "Images",
    operation_id = "setPrimaryImage",
    summary = "Make an image its owner's primary image",
    description = "Clears the primary flag of every other image of the same cat or \
        achievement in the same transaction.",
    params(("id" = Uuid, Path, description = "Image ID")),
    responses(
        (status = 200, description = "Primary image set", body = ImageResponse),
        (status = 400, description = "Image has no owner (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id = %id))]
pub async fn set_primary(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ImageResponse>, AppError> {
    auth_user.require_admin()?;
    let image = gallery::set_primary_image(&state.db, id).await?;
    Ok(Json(image.into()))
}

#[utoipa::path(
    put,
    path = "/metadata",
    tag = "Images",
    operation_id = "updateImageMetadata",
    summary = "Set an image's title and description",
    description = "Upserts the image row for `url`. A new row is not attached to any cat or \
        achievement. Empty strings clear the field.",
    request_body = ImageMetadataRequest,
    responses(
        (status = 200, description = "Metadata saved", body = ImageResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn update_metadata(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ImageMetadataRequest>,
) -> Result<Json<ImageResponse>, AppError> {
    auth_user.require_admin()?;
    let url = validate_image_url(&payload.url)?;
    let title = non_empty(payload.title, "title", MAX_TITLE_CHARS)?;
    let description = non_empty(payload.description, "description", MAX_DESCRIPTION_CHARS)?;

    let image = gallery::update_image_metadata(&state.db, url, title, description).await?;
    Ok(Json(image.into()))
}

/// Trim a text field; blank becomes `None`.
fn non_empty(value: Option<String>, field: &str, max: usize) -> Result<Option<String>, AppError> {
    let Some(value) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(Some(value))
}

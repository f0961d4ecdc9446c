use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use super::achievement::validate_image_url;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::{AppJson, AppQuery};
use crate::gallery;
use crate::models::cat::ImageResponse;
use crate::models::gallery::*;
use crate::state::AppState;

pub fn upload_body_limit(max: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Gallery",
    operation_id = "listGallery",
    summary = "List a gallery folder",
    description = "Lists one page of a storage folder. Entries with an image extension and a \
        size are images; everything else is a folder. Images carry their public URL and, \
        when one exists, the metadata of the matching image row. Page counts are computed \
        from at most 1000 entries.",
    params(GalleryQuery),
    responses(
        (status = 200, description = "Gallery page", body = GalleryPage),
        (status = 400, description = "Invalid path or query (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(path = %query.path))]
pub async fn list_gallery(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<GalleryQuery>,
) -> Result<Json<GalleryPage>, AppError> {
    auth_user.require_admin()?;
    Ok(Json(
        gallery::list_gallery(&*state.store, &state.db, &query).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/folders",
    tag = "Gallery",
    operation_id = "createGalleryFolder",
    summary = "Create a folder",
    description = "Creates an empty folder, stored as a `.emptyFolderPlaceholder` object.",
    request_body = CreateFolderRequest,
    responses(
        (status = 201, description = "Folder created", body = String),
        (status = 400, description = "Invalid path (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Folder exists (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(path = %payload.path))]
pub async fn create_folder(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateFolderRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    let folder = gallery::create_folder(&*state.store, &payload.path).await?;
    Ok((StatusCode::CREATED, Json(folder)))
}

#[utoipa::path(
    patch,
    path = "/folders",
    tag = "Gallery",
    operation_id = "renameGalleryFolder",
    summary = "Rename or move a folder",
    description = "Copies every object below `from` to `to`, removes the originals and \
        rewrites the URLs of matching image rows. There is no rollback if the storage \
        backend fails part way.",
    request_body = RenameFolderRequest,
    responses(
        (status = 200, description = "Folder renamed", body = FolderOperationResponse),
        (status = 400, description = "Invalid path (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Folder not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Target exists (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(from = %payload.from, to = %payload.to))]
pub async fn rename_folder(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<RenameFolderRequest>,
) -> Result<Json<FolderOperationResponse>, AppError> {
    auth_user.require_admin()?;
    Ok(Json(
        gallery::rename_folder(&*state.store, &state.db, &payload.from, &payload.to).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/folders",
    tag = "Gallery",
    operation_id = "deleteGalleryFolder",
    summary = "Delete a folder",
    description = "Removes every object below the folder and deletes the image rows whose \
        URLs pointed at them. Cats that lose their primary image get their next image \
        promoted.",
    params(PathQuery),
    responses(
        (status = 200, description = "Folder deleted", body = FolderOperationResponse),
        (status = 400, description = "Invalid path (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Folder not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(path = %query.path))]
pub async fn delete_folder(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PathQuery>,
) -> Result<Json<FolderOperationResponse>, AppError> {
    auth_user.require_admin()?;
    Ok(Json(
        gallery::delete_folder(&*state.store, &state.db, &query.path).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/images",
    tag = "Gallery",
    operation_id = "uploadGalleryImage",
    summary = "Upload an image",
    description = "Stores the `file` multipart field in the folder given by the optional \
        `path` field (the bucket root when omitted). Only image files are accepted. An \
        existing object with the same name is replaced.",
    request_body(content_type = "multipart/form-data", description = "Image file with optional folder path"),
    responses(
        (status = 201, description = "Image stored", body = UploadResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart))]
pub async fn upload_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let mut file: Option<(String, Vec<u8>)> = None;
    let mut folder = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Validation("File field must have a filename".into()))?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
                file = Some((name, data.to_vec()));
            }
            Some("path") => {
                folder = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read path: {e}")))?;
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let (name, data) = file.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;
    if data.is_empty() {
        return Err(AppError::Validation("File is empty".into()));
    }

    let uploaded = gallery::upload_image(&*state.store, &folder, &name, &data).await?;
    Ok((StatusCode::CREATED, Json(uploaded)))
}

#[utoipa::path(
    delete,
    path = "/images",
    tag = "Gallery",
    operation_id = "deleteGalleryImage",
    summary = "Delete an image",
    description = "Removes the image object and its metadata row. If it was a cat's primary \
        image, the cat's next image becomes primary.",
    params(PathQuery),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 400, description = "Not an image path (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(path = %query.path))]
pub async fn delete_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PathQuery>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    gallery::delete_image(&*state.store, &state.db, &query.path).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/assign",
    tag = "Gallery",
    operation_id = "assignGalleryImage",
    summary = "Assign an image to a cat",
    description = "Creates or updates the image row for `url` and attaches it to the cat. The \
        first image of a cat becomes its primary image; `make_primary` replaces the current one.",
    request_body = AssignImageRequest,
    responses(
        (status = 200, description = "Image assigned", body = ImageResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Cat not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(cat_id = %payload.cat_id))]
pub async fn assign_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<AssignImageRequest>,
) -> Result<Json<ImageResponse>, AppError> {
    auth_user.require_admin()?;
    let url = validate_image_url(&payload.url)?;
    let image =
        gallery::assign_image_to_cat(&state.db, url, payload.cat_id, payload.make_primary).await?;
    Ok(Json(image.into()))
}

#[utoipa::path(
    post,
    path = "/unassign",
    tag = "Gallery",
    operation_id = "unassignGalleryImage",
    summary = "Detach an image from its owner",
    description = "Clears the cat or achievement and the primary flag of the image row. If \
        the image was primary, its owner's first remaining image is promoted.",
    request_body = UnassignImageRequest,
    responses(
        (status = 200, description = "Image detached", body = ImageResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn unassign_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UnassignImageRequest>,
) -> Result<Json<ImageResponse>, AppError> {
    auth_user.require_admin()?;
    let url = validate_image_url(&payload.url)?;
    let image = gallery::unassign_image(&state.db, url).await?;
    Ok(Json(image.into()))
}

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use sea_orm::prelude::Expr;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::aggregate::{fetch_achievements, try_fetch_achievement};
use crate::entity::{achievement, image};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::gallery;
use crate::models::achievement::*;
use crate::models::cat::ImageResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Achievements",
    operation_id = "listAchievements",
    summary = "List achievements",
    description = "Returns every achievement, most recent first, with images in display \
        order. Backend failures yield an empty list.",
    responses(
        (status = 200, description = "Achievements", body = Vec<AchievementDetails>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_achievements(State(state): State<AppState>) -> Json<Vec<AchievementDetails>> {
    Json(fetch_achievements(&state.db).await)
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Admin Achievements",
    operation_id = "createAchievement",
    summary = "Create an achievement",
    request_body = CreateAchievementRequest,
    responses(
        (status = 201, description = "Achievement created", body = AchievementDetails),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title))]
pub async fn create_achievement(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateAchievementRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_create_achievement(&payload)?;

    let model = achievement::ActiveModel {
        id: Set(Uuid::now_v7()),
        title: Set(payload.title.trim().to_string()),
        description: Set(payload.description),
        achieved_on: Set(payload.achieved_on),
        created_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(AchievementDetails::bare(model))))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Admin Achievements",
    operation_id = "updateAchievement",
    summary = "Update an achievement",
    params(("id" = Uuid, Path, description = "Achievement ID")),
    request_body = UpdateAchievementRequest,
    responses(
        (status = 200, description = "Achievement updated", body = AchievementDetails),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Achievement not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id = %id))]
pub async fn update_achievement(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateAchievementRequest>,
) -> Result<Json<AchievementDetails>, AppError> {
    auth_user.require_admin()?;
    validate_update_achievement(&payload)?;

    if payload != UpdateAchievementRequest::default() {
        let existing = find_achievement(&state.db, id).await?;
        let mut active: achievement::ActiveModel = existing.into();
        if let Some(ref title) = payload.title {
            active.title = Set(title.trim().to_string());
        }
        if let Some(description) = payload.description {
            active.description = Set(description);
        }
        if let Some(achieved_on) = payload.achieved_on {
            active.achieved_on = Set(achieved_on);
        }
        active.update(&state.db).await?;
    }

    load_achievement(&state.db, id).await.map(Json)
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Admin Achievements",
    operation_id = "deleteAchievement",
    summary = "Delete an achievement",
    description = "Deletes an achievement. Its images are detached and stay in the gallery.",
    params(("id" = Uuid, Path, description = "Achievement ID")),
    responses(
        (status = 204, description = "Achievement deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Achievement not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id = %id))]
pub async fn delete_achievement(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let txn = state.db.begin().await?;
    find_achievement(&txn, id).await?;
    image::Entity::update_many()
        .col_expr(image::Column::AchievementId, Expr::value(Option::<Uuid>::None))
        .col_expr(image::Column::IsPrimary, Expr::value(false))
        .filter(image::Column::AchievementId.eq(id))
        .exec(&txn)
        .await?;
    achievement::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/{id}/images",
    tag = "Admin Achievements",
    operation_id = "attachAchievementImage",
    summary = "Attach a gallery image to an achievement",
    description = "Appends the image to the achievement's images. An image owned by a cat is \
        moved to the achievement.",
    params(("id" = Uuid, Path, description = "Achievement ID")),
    request_body = AttachAchievementImageRequest,
    responses(
        (status = 201, description = "Image attached", body = ImageResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Achievement not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id = %id))]
pub async fn attach_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<AttachAchievementImageRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    let url = validate_image_url(&payload.url)?;

    let image = gallery::attach_image_to_achievement(&state.db, id, url).await?;
    Ok((StatusCode::CREATED, Json(ImageResponse::from(image))))
}

#[utoipa::path(
    put,
    path = "/{id}/images/swap",
    tag = "Admin Achievements",
    operation_id = "swapAchievementImages",
    summary = "Swap the display positions of two achievement images",
    params(("id" = Uuid, Path, description = "Achievement ID")),
    request_body = SwapImagesRequest,
    responses(
        (status = 200, description = "Images swapped", body = AchievementDetails),
        (status = 400, description = "Image belongs elsewhere (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Achievement or image not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id = %id))]
pub async fn swap_images(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<SwapImagesRequest>,
) -> Result<Json<AchievementDetails>, AppError> {
    auth_user.require_admin()?;
    if payload.first_image_id == payload.second_image_id {
        return Err(AppError::Validation("Cannot swap an image with itself".into()));
    }
    find_achievement(&state.db, id).await?;

    gallery::swap_display_order(&state.db, id, payload.first_image_id, payload.second_image_id)
        .await?;
    load_achievement(&state.db, id).await.map(Json)
}

/// Trimmed, non-empty image URL.
pub(crate) fn validate_image_url(url: &str) -> Result<&str, AppError> {
    let url = url.trim();
    if url.is_empty() || url.len() > 2048 {
        return Err(AppError::Validation("url must be 1-2048 characters".into()));
    }
    Ok(url)
}

async fn find_achievement<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<achievement::Model, AppError> {
    achievement::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Achievement not found".into()))
}

async fn load_achievement(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<AchievementDetails, AppError> {
    try_fetch_achievement(db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Achievement not found".into()))
}

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use sea_orm::*;
use tracing::{error, instrument};
use uuid::Uuid;

use crate::aggregate::{
    fetch_litters_by_status, retain_complete_litters, try_fetch_litter,
    try_fetch_litters_by_status, try_fetch_litters_page,
};
use crate::entity::{Gender, LitterStatus, cat, cat_litter, litter};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::{AppJson, AppQuery};
use crate::models::litter::*;
use crate::models::shared::validate_bulk_ids;
use crate::state::AppState;

const MAX_KITTENS: usize = 20;

#[utoipa::path(
    get,
    path = "/",
    tag = "Litters",
    operation_id = "listLitters",
    summary = "List litters by status",
    description = "Returns litters with the given status and both parents resolved. Planned \
        litters are ordered by expected date, others by birth date (newest first). Backend \
        failures yield an empty list.",
    params(LitterListQuery),
    responses(
        (status = 200, description = "Litters", body = Vec<LitterDetails>),
        (status = 400, description = "Invalid query (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(status = ?query.status, limit = ?query.limit))]
pub async fn list_litters(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<LitterListQuery>,
) -> Json<Vec<LitterDetails>> {
    let limit = query.limit.map(|l| l.clamp(1, 100));
    let mut litters = fetch_litters_by_status(&state.db, query.status, limit).await;
    retain_complete_litters(&mut litters);
    Json(litters)
}

#[utoipa::path(
    get,
    path = "/past",
    tag = "Litters",
    operation_id = "listPastLitters",
    summary = "Page through past litters",
    description = "Returns one page of past litters, newest first. `total` counts every past \
        litter, including those hidden because a parent no longer exists.",
    params(PastLitterQuery),
    responses(
        (status = 200, description = "Page of past litters", body = PastLittersResponse),
        (status = 400, description = "Invalid query (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(page = ?query.page, limit = ?query.limit))]
pub async fn list_past_litters(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PastLitterQuery>,
) -> Json<PastLittersResponse> {
    let page = Ord::max(query.page.unwrap_or(1), 1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let (mut litters, total) =
        match try_fetch_litters_page(&state.db, LitterStatus::Past, page, limit).await {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "Failed to fetch past litters");
                (Vec::new(), 0)
            }
        };
    retain_complete_litters(&mut litters);

    Json(PastLittersResponse {
        litters,
        pagination: LitterPagination::new(page, limit, total),
    })
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Admin Litters",
    operation_id = "listAllLitters",
    summary = "List every litter",
    description = "Returns planned, current and past litters, including litters whose \
        parents no longer exist.",
    responses(
        (status = 200, description = "All litters", body = Vec<LitterDetails>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_all_litters(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<LitterDetails>>, AppError> {
    auth_user.require_admin()?;

    let (planned, current, past) = tokio::try_join!(
        try_fetch_litters_by_status(&state.db, LitterStatus::Planned, None),
        try_fetch_litters_by_status(&state.db, LitterStatus::Current, None),
        try_fetch_litters_by_status(&state.db, LitterStatus::Past, None),
    )?;

    Ok(Json(planned.into_iter().chain(current).chain(past).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Admin Litters",
    operation_id = "createLitter",
    summary = "Create a litter",
    description = "The mother must be a female cat and the father a male cat.",
    request_body = CreateLitterRequest,
    responses(
        (status = 201, description = "Litter created", body = LitterDetails),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn create_litter(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateLitterRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_create_litter(&payload)?;
    check_parent(&state.db, payload.mother_id, Gender::Female).await?;
    check_parent(&state.db, payload.father_id, Gender::Male).await?;

    let model = litter::ActiveModel {
        id: Set(Uuid::now_v7()),
        mother_id: Set(payload.mother_id),
        father_id: Set(payload.father_id),
        birth_date: Set(payload.birth_date),
        expected_date: Set(payload.expected_date),
        number_of_kittens: Set(payload.number_of_kittens),
        number_of_males: Set(payload.number_of_males),
        number_of_females: Set(payload.number_of_females),
        description: Set(payload.description),
        details: Set(payload.details),
        status: Set(payload.status),
        created_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await?;

    let details = load_litter(&state.db, model.id).await?;
    Ok((StatusCode::CREATED, Json(details)))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Admin Litters",
    operation_id = "updateLitter",
    summary = "Update a litter",
    description = "Partially updates a litter using PATCH semantics.",
    params(("id" = Uuid, Path, description = "Litter ID")),
    request_body = UpdateLitterRequest,
    responses(
        (status = 200, description = "Litter updated", body = LitterDetails),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Litter not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id = %id))]
pub async fn update_litter(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateLitterRequest>,
) -> Result<Json<LitterDetails>, AppError> {
    auth_user.require_admin()?;
    validate_update_litter(&payload)?;

    if payload != UpdateLitterRequest::default() {
        let existing = find_litter(&state.db, id).await?;
        let mother_id = payload.mother_id.unwrap_or(existing.mother_id);
        let father_id = payload.father_id.unwrap_or(existing.father_id);
        if mother_id == father_id {
            return Err(AppError::Validation(
                "Mother and father must be different cats".into(),
            ));
        }
        if let Some(mother_id) = payload.mother_id {
            check_parent(&state.db, mother_id, Gender::Female).await?;
        }
        if let Some(father_id) = payload.father_id {
            check_parent(&state.db, father_id, Gender::Male).await?;
        }

        let mut active: litter::ActiveModel = existing.into();
        active.mother_id = Set(mother_id);
        active.father_id = Set(father_id);
        if let Some(birth_date) = payload.birth_date {
            active.birth_date = Set(birth_date);
        }
        if let Some(expected_date) = payload.expected_date {
            active.expected_date = Set(expected_date);
        }
        if let Some(n) = payload.number_of_kittens {
            active.number_of_kittens = Set(n);
        }
        if let Some(n) = payload.number_of_males {
            active.number_of_males = Set(n);
        }
        if let Some(n) = payload.number_of_females {
            active.number_of_females = Set(n);
        }
        if let Some(description) = payload.description {
            active.description = Set(description);
        }
        if let Some(details) = payload.details {
            active.details = Set(details);
        }
        if let Some(status) = payload.status {
            active.status = Set(status);
        }
        active.update(&state.db).await?;
    }

    load_litter(&state.db, id).await.map(Json)
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Admin Litters",
    operation_id = "deleteLitter",
    summary = "Delete a litter",
    description = "Deletes a litter and its kitten memberships. The kittens themselves are kept.",
    params(("id" = Uuid, Path, description = "Litter ID")),
    responses(
        (status = 204, description = "Litter deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Litter not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id = %id))]
pub async fn delete_litter(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let txn = state.db.begin().await?;
    find_litter(&txn, id).await?;
    cat_litter::Entity::delete_many()
        .filter(cat_litter::Column::LitterId.eq(id))
        .exec(&txn)
        .await?;
    litter::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/{id}/kittens",
    tag = "Admin Litters",
    operation_id = "setLitterKittens",
    summary = "Replace the kittens of a litter",
    description = "Sets the complete kitten list. Listed cats are removed from any other \
        litter first, so a cat belongs to at most one litter.",
    params(("id" = Uuid, Path, description = "Litter ID")),
    request_body = SetKittensRequest,
    responses(
        (status = 200, description = "Kittens replaced", body = LitterDetails),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Litter not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id = %id, count = payload.cat_ids.len()))]
pub async fn set_kittens(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<SetKittensRequest>,
) -> Result<Json<LitterDetails>, AppError> {
    auth_user.require_admin()?;
    validate_bulk_ids(&payload.cat_ids, "kitten", MAX_KITTENS)?;

    let txn = state.db.begin().await?;
    let existing = find_litter(&txn, id).await?;
    if payload
        .cat_ids
        .iter()
        .any(|c| *c == existing.mother_id || *c == existing.father_id)
    {
        return Err(AppError::Validation(
            "A parent cannot be a kitten of its own litter".into(),
        ));
    }

    if !payload.cat_ids.is_empty() {
        let found = cat::Entity::find()
            .filter(cat::Column::Id.is_in(payload.cat_ids.iter().copied()))
            .count(&txn)
            .await?;
        if found != payload.cat_ids.len() as u64 {
            return Err(AppError::Validation("Unknown kitten ID".into()));
        }
    }

    cat_litter::Entity::delete_many()
        .filter(
            Condition::any()
                .add(cat_litter::Column::LitterId.eq(id))
                .add(cat_litter::Column::CatId.is_in(payload.cat_ids.iter().copied())),
        )
        .exec(&txn)
        .await?;
    if !payload.cat_ids.is_empty() {
        cat_litter::Entity::insert_many(payload.cat_ids.iter().map(|&cat_id| {
            cat_litter::ActiveModel {
                cat_id: Set(cat_id),
                litter_id: Set(id),
            }
        }))
        .exec_without_returning(&txn)
        .await?;
    }
    txn.commit().await?;

    load_litter(&state.db, id).await.map(Json)
}

async fn check_parent<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    gender: Gender,
) -> Result<(), AppError> {
    let parent = cat::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::Validation(format!("Unknown cat {id}")))?;
    if parent.gender != gender {
        let (role, expected) = match gender {
            Gender::Female => ("Mother", "female"),
            Gender::Male => ("Father", "male"),
        };
        return Err(AppError::Validation(format!(
            "{role} must be a {expected} cat"
        )));
    }
    Ok(())
}

async fn find_litter<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<litter::Model, AppError> {
    litter::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Litter not found".into()))
}

async fn load_litter(db: &DatabaseConnection, id: Uuid) -> Result<LitterDetails, AppError> {
    try_fetch_litter(db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Litter not found".into()))
}

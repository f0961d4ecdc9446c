use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use sea_orm::prelude::Expr;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::aggregate::{
    COLOR_GENETICS_TEST_NAME, COLOR_TEST_TYPE, CatFilter, fetch_cats_with_details, try_fetch_cat,
    try_fetch_cats_with_details,
};
use crate::entity::{
    CatStatus, blood_type, cat, cat_blood_type, cat_color, cat_litter, cat_variety, color,
    genetic_test, image, medical_test, variety,
};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::{AppJson, AppQuery};
use crate::models::cat::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Cats",
    operation_id = "listBreedingCats",
    summary = "List breeding cats",
    description = "Returns the cattery's own breeding cats that are alive, with images, \
        traits and medical tests. Optionally filtered by gender. Backend failures yield an \
        empty list.",
    params(CatListQuery),
    responses(
        (status = 200, description = "Breeding cats ordered by name", body = Vec<CatDetails>),
        (status = 400, description = "Invalid query (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(gender = ?query.gender))]
pub async fn list_breeding_cats(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<CatListQuery>,
) -> Json<Vec<CatDetails>> {
    Json(fetch_cats_with_details(&state.db, &CatFilter::breeding(query.gender)).await)
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Cats",
    operation_id = "getCat",
    summary = "Get a cat by ID",
    params(("id" = Uuid, Path, description = "Cat ID")),
    responses(
        (status = 200, description = "Cat details", body = CatDetails),
        (status = 404, description = "Cat not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn get_cat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CatDetails>, AppError> {
    let details = try_fetch_cat(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cat not found".into()))?;
    Ok(Json(details))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Admin Cats",
    operation_id = "listAllCats",
    summary = "List every cat",
    description = "Returns all cats regardless of status or breeding flags.",
    responses(
        (status = 200, description = "All cats ordered by name", body = Vec<CatDetails>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn list_all_cats(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<CatDetails>>, AppError> {
    auth_user.require_admin()?;
    Ok(Json(
        try_fetch_cats_with_details(&state.db, &CatFilter::all()).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Admin Cats",
    operation_id = "createCat",
    summary = "Create a cat",
    request_body = CreateCatRequest,
    responses(
        (status = 201, description = "Cat created", body = CatDetails),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_cat(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCatRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_create_cat(&payload)?;

    let now = Utc::now();
    let model = cat::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(payload.name.trim().to_string()),
        birth_date: Set(payload.birth_date),
        gender: Set(payload.gender),
        description: Set(payload.description),
        details: Set(payload.details),
        is_breeding: Set(payload.is_breeding),
        is_neutered: Set(payload.is_neutered),
        is_own_breeding_cat: Set(payload.is_own_breeding_cat),
        status: Set(payload.status.unwrap_or(CatStatus::Alive)),
        pedigree_link: Set(payload.pedigree_link),
        youtube_video_link: Set(payload.youtube_video_link),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(CatDetails::bare(model))))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Admin Cats",
    operation_id = "updateCat",
    summary = "Update a cat",
    description = "Partially updates a cat using PATCH semantics. An empty payload returns \
        the current resource unchanged.",
    params(("id" = Uuid, Path, description = "Cat ID")),
    request_body = UpdateCatRequest,
    responses(
        (status = 200, description = "Cat updated", body = CatDetails),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Cat not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id = %id))]
pub async fn update_cat(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateCatRequest>,
) -> Result<Json<CatDetails>, AppError> {
    auth_user.require_admin()?;
    validate_update_cat(&payload)?;

    if payload != UpdateCatRequest::default() {
        let existing = find_cat(&state.db, id).await?;
        let mut active: cat::ActiveModel = existing.into();

        if let Some(ref name) = payload.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(birth_date) = payload.birth_date {
            active.birth_date = Set(birth_date);
        }
        if let Some(gender) = payload.gender {
            active.gender = Set(gender);
        }
        if let Some(description) = payload.description {
            active.description = Set(description);
        }
        if let Some(details) = payload.details {
            active.details = Set(details);
        }
        if let Some(is_breeding) = payload.is_breeding {
            active.is_breeding = Set(is_breeding);
        }
        if let Some(is_neutered) = payload.is_neutered {
            active.is_neutered = Set(is_neutered);
        }
        if let Some(is_own_breeding_cat) = payload.is_own_breeding_cat {
            active.is_own_breeding_cat = Set(is_own_breeding_cat);
        }
        if let Some(status) = payload.status {
            active.status = Set(status);
        }
        if let Some(pedigree_link) = payload.pedigree_link {
            active.pedigree_link = Set(pedigree_link);
        }
        if let Some(youtube_video_link) = payload.youtube_video_link {
            active.youtube_video_link = Set(youtube_video_link);
        }
        active.updated_at = Set(Utc::now());
        active.update(&state.db).await?;
    }

    load_cat(&state.db, id).await.map(Json)
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Admin Cats",
    operation_id = "deleteCat",
    summary = "Delete a cat",
    description = "Deletes a cat with its trait relations, tests and litter membership. Its \
        images are detached, not deleted. Litters naming the cat as a parent are kept and no \
        longer appear in public listings.",
    params(("id" = Uuid, Path, description = "Cat ID")),
    responses(
        (status = 204, description = "Cat deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Cat not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id = %id))]
pub async fn delete_cat(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let txn = state.db.begin().await?;
    find_cat(&txn, id).await?;

    cat_color::Entity::delete_many()
        .filter(cat_color::Column::CatId.eq(id))
        .exec(&txn)
        .await?;
    cat_variety::Entity::delete_many()
        .filter(cat_variety::Column::CatId.eq(id))
        .exec(&txn)
        .await?;
    cat_blood_type::Entity::delete_many()
        .filter(cat_blood_type::Column::CatId.eq(id))
        .exec(&txn)
        .await?;
    genetic_test::Entity::delete_many()
        .filter(genetic_test::Column::CatId.eq(id))
        .exec(&txn)
        .await?;
    medical_test::Entity::delete_many()
        .filter(medical_test::Column::CatId.eq(id))
        .exec(&txn)
        .await?;
    cat_litter::Entity::delete_many()
        .filter(cat_litter::Column::CatId.eq(id))
        .exec(&txn)
        .await?;
    image::Entity::update_many()
        .col_expr(image::Column::CatId, Expr::value(Option::<Uuid>::None))
        .col_expr(image::Column::IsPrimary, Expr::value(false))
        .filter(image::Column::CatId.eq(id))
        .exec(&txn)
        .await?;
    cat::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/{id}/traits",
    tag = "Admin Cats",
    operation_id = "setCatTraits",
    summary = "Replace a cat's color, variety, blood type and color genetics",
    description = "Replaces every color and variety relation, the blood type and the \
        \"Color Genetics\" test result. Omitted fields clear the corresponding relation.",
    params(("id" = Uuid, Path, description = "Cat ID")),
    request_body = SetCatTraitsRequest,
    responses(
        (status = 200, description = "Traits replaced", body = CatDetails),
        (status = 400, description = "Unknown lookup ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Cat not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id = %id))]
pub async fn set_cat_traits(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<SetCatTraitsRequest>,
) -> Result<Json<CatDetails>, AppError> {
    auth_user.require_admin()?;

    let txn = state.db.begin().await?;
    find_cat(&txn, id).await?;

    for color_id in [payload.phenotype_color_id, payload.genotype_color_id]
        .into_iter()
        .flatten()
    {
        if color::Entity::find_by_id(color_id).one(&txn).await?.is_none() {
            return Err(AppError::Validation(format!("Unknown color {color_id}")));
        }
    }
    for variety_id in [payload.phenotype_variety_id, payload.genotype_variety_id]
        .into_iter()
        .flatten()
    {
        if variety::Entity::find_by_id(variety_id).one(&txn).await?.is_none() {
            return Err(AppError::Validation(format!("Unknown variety {variety_id}")));
        }
    }
    if let Some(blood_type_id) = payload.blood_type_id
        && blood_type::Entity::find_by_id(blood_type_id)
            .one(&txn)
            .await?
            .is_none()
    {
        return Err(AppError::Validation(format!(
            "Unknown blood type {blood_type_id}"
        )));
    }

    cat_color::Entity::delete_many()
        .filter(cat_color::Column::CatId.eq(id))
        .exec(&txn)
        .await?;
    for (color_id, is_phenotype, is_genotype) in
        trait_rows(payload.phenotype_color_id, payload.genotype_color_id)
    {
        cat_color::ActiveModel {
            id: Set(Uuid::now_v7()),
            cat_id: Set(id),
            color_id: Set(color_id),
            is_phenotype: Set(is_phenotype),
            is_genotype: Set(is_genotype),
        }
        .insert(&txn)
        .await?;
    }

    cat_variety::Entity::delete_many()
        .filter(cat_variety::Column::CatId.eq(id))
        .exec(&txn)
        .await?;
    for (variety_id, is_phenotype, is_genotype) in
        trait_rows(payload.phenotype_variety_id, payload.genotype_variety_id)
    {
        cat_variety::ActiveModel {
            id: Set(Uuid::now_v7()),
            cat_id: Set(id),
            variety_id: Set(variety_id),
            is_phenotype: Set(is_phenotype),
            is_genotype: Set(is_genotype),
        }
        .insert(&txn)
        .await?;
    }

    cat_blood_type::Entity::delete_many()
        .filter(cat_blood_type::Column::CatId.eq(id))
        .exec(&txn)
        .await?;
    if let Some(blood_type_id) = payload.blood_type_id {
        cat_blood_type::ActiveModel {
            cat_id: Set(id),
            blood_type_id: Set(blood_type_id),
        }
        .insert(&txn)
        .await?;
    }

    genetic_test::Entity::delete_many()
        .filter(genetic_test::Column::CatId.eq(id))
        .filter(genetic_test::Column::TestType.eq(COLOR_TEST_TYPE))
        .filter(genetic_test::Column::TestName.eq(COLOR_GENETICS_TEST_NAME))
        .exec(&txn)
        .await?;
    if let Some(code) = payload
        .genetic_code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
    {
        genetic_test::ActiveModel {
            id: Set(Uuid::now_v7()),
            cat_id: Set(id),
            test_type: Set(COLOR_TEST_TYPE.to_string()),
            test_name: Set(COLOR_GENETICS_TEST_NAME.to_string()),
            result: Set(code.to_string()),
            test_date: Set(None),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    load_cat(&state.db, id).await.map(Json)
}

#[utoipa::path(
    post,
    path = "/{id}/medical-tests",
    tag = "Admin Cats",
    operation_id = "addMedicalTest",
    summary = "Record a medical test for a cat",
    params(("id" = Uuid, Path, description = "Cat ID")),
    request_body = CreateMedicalTestRequest,
    responses(
        (status = 201, description = "Medical test recorded", body = MedicalTestResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Cat not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id = %id))]
pub async fn add_medical_test(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<CreateMedicalTestRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_create_medical_test(&payload)?;
    find_cat(&state.db, id).await?;

    let model = medical_test::ActiveModel {
        id: Set(Uuid::now_v7()),
        cat_id: Set(id),
        test_name: Set(payload.test_name.trim().to_string()),
        test_date: Set(payload.test_date),
        result: Set(payload.result.trim().to_string()),
        certificate_url: Set(payload.certificate_url),
        created_at: Set(Utc::now()),
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(MedicalTestResponse::from(model))))
}

#[utoipa::path(
    delete,
    path = "/{id}/medical-tests/{test_id}",
    tag = "Admin Cats",
    operation_id = "deleteMedicalTest",
    summary = "Delete a medical test",
    params(
        ("id" = Uuid, Path, description = "Cat ID"),
        ("test_id" = Uuid, Path, description = "Medical test ID"),
    ),
    responses(
        (status = 204, description = "Medical test deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Medical test not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id = %id, test_id = %test_id))]
pub async fn delete_medical_test(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((id, test_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let result = medical_test::Entity::delete_many()
        .filter(medical_test::Column::Id.eq(test_id))
        .filter(medical_test::Column::CatId.eq(id))
        .exec(&state.db)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Medical test not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// `(lookup id, is_phenotype, is_genotype)` rows for a phenotype/genotype pair.
/// The same lookup on both sides becomes one row with both flags.
fn trait_rows(phenotype: Option<Uuid>, genotype: Option<Uuid>) -> Vec<(Uuid, bool, bool)> {
    match (phenotype, genotype) {
        (Some(p), Some(g)) if p == g => vec![(p, true, true)],
        (p, g) => p
            .map(|p| (p, true, false))
            .into_iter()
            .chain(g.map(|g| (g, false, true)))
            .collect(),
    }
}

pub(crate) async fn find_cat<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<cat::Model, AppError> {
    cat::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Cat not found".into()))
}

async fn load_cat(db: &DatabaseConnection, id: Uuid) -> Result<CatDetails, AppError> {
    try_fetch_cat(db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cat not found".into()))
}

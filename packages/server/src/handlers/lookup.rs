use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::{error, instrument};
use uuid::Uuid;

use crate::entity::{blood_type, color, variety};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::cat::{ColorResponse, VarietyResponse};
use crate::models::lookup::*;
use crate::models::shared::validate_name;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Lookups",
    operation_id = "listLookups",
    summary = "List colors, varieties and blood types",
    description = "Each list is ordered by name. Backend failures yield empty lists.",
    responses(
        (status = 200, description = "Lookup tables", body = LookupsResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn list_lookups(State(state): State<AppState>) -> Json<LookupsResponse> {
    let result = tokio::try_join!(
        color::Entity::find()
            .order_by_asc(color::Column::Name)
            .all(&state.db),
        variety::Entity::find()
            .order_by_asc(variety::Column::Name)
            .all(&state.db),
        blood_type::Entity::find()
            .order_by_asc(blood_type::Column::Name)
            .all(&state.db),
    );

    let (colors, varieties, blood_types) = result.unwrap_or_else(|e| {
        error!(error = %e, "Failed to fetch lookups");
        Default::default()
    });

    Json(LookupsResponse {
        colors: colors.into_iter().map(Into::into).collect(),
        varieties: varieties.into_iter().map(Into::into).collect(),
        blood_types: blood_types.into_iter().map(Into::into).collect(),
    })
}

#[utoipa::path(
    post,
    path = "/colors",
    tag = "Admin Lookups",
    operation_id = "createColor",
    summary = "Create a color",
    request_body = CreateColorRequest,
    responses(
        (status = 201, description = "Color created", body = ColorResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Name already exists (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_color(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateColorRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_name("Name", &payload.name)?;
    let name = payload.name.trim().to_string();

    if color::Entity::find()
        .filter(color::Column::Name.eq(name.as_str()))
        .one(&state.db)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!("Color '{name}' already exists")));
    }

    let model = color::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(name),
        code: Set(payload.code),
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(ColorResponse::from(model))))
}

#[utoipa::path(
    post,
    path = "/varieties",
    tag = "Admin Lookups",
    operation_id = "createVariety",
    summary = "Create a variety",
    request_body = CreateVarietyRequest,
    responses(
        (status = 201, description = "Variety created", body = VarietyResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Name already exists (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_variety(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateVarietyRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_name("Name", &payload.name)?;
    let name = payload.name.trim().to_string();

    if variety::Entity::find()
        .filter(variety::Column::Name.eq(name.as_str()))
        .one(&state.db)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!("Variety '{name}' already exists")));
    }

    let model = variety::ActiveModel {
        id: Set(Uuid::now_v7()),
        name: Set(name),
        description: Set(payload.description),
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(VarietyResponse::from(model))))
}

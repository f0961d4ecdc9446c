use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cat::CatDetails;
use super::shared::{double_option, validate_optional_count};
use crate::entity::{LitterStatus, litter};
use crate::error::AppError;

/// A litter with its parents and kittens resolved.
#[derive(Clone, Debug, PartialEq, Serialize, utoipa::ToSchema)]
pub struct LitterDetails {
    pub id: Uuid,
    pub mother_id: Uuid,
    pub father_id: Uuid,
    pub birth_date: Option<NaiveDate>,
    pub expected_date: Option<NaiveDate>,
    pub number_of_kittens: Option<i32>,
    pub number_of_males: Option<i32>,
    pub number_of_females: Option<i32>,
    pub description: Option<String>,
    pub details: Option<String>,
    pub status: LitterStatus,
    /// `null` when the mother no longer exists.
    pub mother: Option<CatDetails>,
    /// `null` when the father no longer exists.
    pub father: Option<CatDetails>,
    pub kittens: Vec<CatDetails>,
}

impl LitterDetails {
    pub fn bare(m: litter::Model) -> Self {
        Self {
            id: m.id,
            mother_id: m.mother_id,
            father_id: m.father_id,
            birth_date: m.birth_date,
            expected_date: m.expected_date,
            number_of_kittens: m.number_of_kittens,
            number_of_males: m.number_of_males,
            number_of_females: m.number_of_females,
            description: m.description,
            details: m.details,
            status: m.status,
            mother: None,
            father: None,
            kittens: Vec::new(),
        }
    }

    /// Both parents resolved.
    pub fn is_complete(&self) -> bool {
        self.mother.is_some() && self.father.is_some()
    }
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LitterListQuery {
    pub status: LitterStatus,
    /// Maximum number of litters, 1-100.
    pub limit: Option<u64>,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PastLitterQuery {
    /// 1-based page number. Default 1.
    pub page: Option<u64>,
    /// Page size, 1-100. Default 10.
    pub limit: Option<u64>,
}

/// Pagination block of the past-litters endpoint.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LitterPagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_more: bool,
}

impl LitterPagination {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let total_pages = total.div_ceil(limit);
        Self {
            page,
            limit,
            total,
            total_pages,
            has_more: page < total_pages,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PastLittersResponse {
    pub litters: Vec<LitterDetails>,
    pub pagination: LitterPagination,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateLitterRequest {
    pub mother_id: Uuid,
    pub father_id: Uuid,
    pub birth_date: Option<NaiveDate>,
    pub expected_date: Option<NaiveDate>,
    pub number_of_kittens: Option<i32>,
    pub number_of_males: Option<i32>,
    pub number_of_females: Option<i32>,
    pub description: Option<String>,
    pub details: Option<String>,
    pub status: LitterStatus,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateLitterRequest {
    pub mother_id: Option<Uuid>,
    pub father_id: Option<Uuid>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<NaiveDate>)]
    pub birth_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<NaiveDate>)]
    pub expected_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub number_of_kittens: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub number_of_males: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub number_of_females: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub details: Option<Option<String>>,
    pub status: Option<LitterStatus>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct SetKittensRequest {
    /// Complete kitten list; cats are moved out of any other litter.
    pub cat_ids: Vec<Uuid>,
}

pub fn validate_create_litter(req: &CreateLitterRequest) -> Result<(), AppError> {
    if req.mother_id == req.father_id {
        return Err(AppError::Validation(
            "Mother and father must be different cats".into(),
        ));
    }
    validate_optional_count("number_of_kittens", req.number_of_kittens)?;
    validate_optional_count("number_of_males", req.number_of_males)?;
    validate_optional_count("number_of_females", req.number_of_females)?;
    Ok(())
}

pub fn validate_update_litter(req: &UpdateLitterRequest) -> Result<(), AppError> {
    if let (Some(m), Some(f)) = (req.mother_id, req.father_id)
        && m == f
    {
        return Err(AppError::Validation(
            "Mother and father must be different cats".into(),
        ));
    }
    validate_optional_count("number_of_kittens", req.number_of_kittens.flatten())?;
    validate_optional_count("number_of_males", req.number_of_males.flatten())?;
    validate_optional_count("number_of_females", req.number_of_females.flatten())?;
    Ok(())
}

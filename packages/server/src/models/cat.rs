use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::shared::{double_option, validate_name};
use crate::entity::{
    CatStatus, Gender, blood_type, cat, color, image, medical_test, variety,
};
use crate::error::AppError;

/// Image metadata as attached to a cat or achievement.
#[derive(Clone, Debug, PartialEq, Serialize, utoipa::ToSchema)]
pub struct ImageResponse {
    pub id: Uuid,
    #[schema(example = "https://x.supabase.co/storage/v1/object/public/gallery/cats/luna.jpg")]
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_primary: bool,
    pub display_order: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<image::Model> for ImageResponse {
    fn from(m: image::Model) -> Self {
        Self {
            id: m.id,
            url: m.url,
            title: m.title,
            description: m.description,
            is_primary: m.is_primary,
            display_order: m.display_order,
            created_at: m.created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, utoipa::ToSchema)]
pub struct ColorResponse {
    pub id: Uuid,
    #[schema(example = "blue silver shaded")]
    pub name: String,
    #[schema(example = "a 11")]
    pub code: Option<String>,
}

impl From<color::Model> for ColorResponse {
    fn from(m: color::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            code: m.code,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, utoipa::ToSchema)]
pub struct VarietyResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl From<variety::Model> for VarietyResponse {
    fn from(m: variety::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, utoipa::ToSchema)]
pub struct BloodTypeResponse {
    pub id: Uuid,
    #[schema(example = "A")]
    pub name: String,
}

impl From<blood_type::Model> for BloodTypeResponse {
    fn from(m: blood_type::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, utoipa::ToSchema)]
pub struct MedicalTestResponse {
    pub id: Uuid,
    pub cat_id: Uuid,
    #[schema(example = "HCM echocardiography")]
    pub test_name: String,
    pub test_date: Option<NaiveDate>,
    pub result: String,
    pub certificate_url: Option<String>,
}

impl From<medical_test::Model> for MedicalTestResponse {
    fn from(m: medical_test::Model) -> Self {
        Self {
            id: m.id,
            cat_id: m.cat_id,
            test_name: m.test_name,
            test_date: m.test_date,
            result: m.result,
            certificate_url: m.certificate_url,
        }
    }
}

/// A cat joined with its images, traits and tests.
#[derive(Clone, Debug, PartialEq, Serialize, utoipa::ToSchema)]
pub struct CatDetails {
    pub id: Uuid,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Gender,
    pub description: Option<String>,
    pub details: Option<String>,
    pub is_breeding: bool,
    pub is_neutered: bool,
    pub is_own_breeding_cat: bool,
    pub status: CatStatus,
    pub pedigree_link: Option<String>,
    pub youtube_video_link: Option<String>,
    /// Ordered for display; the first primary image is the thumbnail.
    pub images: Vec<ImageResponse>,
    /// Phenotype color, `null` when not set.
    pub color: Option<ColorResponse>,
    /// Phenotype variety, `null` when not set.
    pub variety: Option<VarietyResponse>,
    pub blood_type: Option<BloodTypeResponse>,
    /// Result of the "Color Genetics" test.
    #[schema(example = "a 11 / ny 11")]
    pub genetic_code: Option<String>,
    pub medical_tests: Vec<MedicalTestResponse>,
}

impl CatDetails {
    /// Base view of a cat row with every relation empty.
    pub fn bare(m: cat::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            birth_date: m.birth_date,
            gender: m.gender,
            description: m.description,
            details: m.details,
            is_breeding: m.is_breeding,
            is_neutered: m.is_neutered,
            is_own_breeding_cat: m.is_own_breeding_cat,
            status: m.status,
            pedigree_link: m.pedigree_link,
            youtube_video_link: m.youtube_video_link,
            images: Vec::new(),
            color: None,
            variety: None,
            blood_type: None,
            genetic_code: None,
            medical_tests: Vec::new(),
        }
    }
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatListQuery {
    /// Restrict to one gender. Both genders when omitted.
    pub gender: Option<Gender>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCatRequest {
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Gender,
    pub description: Option<String>,
    pub details: Option<String>,
    #[serde(default)]
    pub is_breeding: bool,
    #[serde(default)]
    pub is_neutered: bool,
    #[serde(default)]
    pub is_own_breeding_cat: bool,
    pub status: Option<CatStatus>,
    pub pedigree_link: Option<String>,
    pub youtube_video_link: Option<String>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateCatRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<NaiveDate>)]
    pub birth_date: Option<Option<NaiveDate>>,
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub details: Option<Option<String>>,
    pub is_breeding: Option<bool>,
    pub is_neutered: Option<bool>,
    pub is_own_breeding_cat: Option<bool>,
    pub status: Option<CatStatus>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub pedigree_link: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub youtube_video_link: Option<Option<String>>,
}

/// Replaces every color/variety/blood-type relation and the color genetics
/// result of a cat. Omitted (or null) fields clear the relation.
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct SetCatTraitsRequest {
    pub phenotype_color_id: Option<Uuid>,
    pub genotype_color_id: Option<Uuid>,
    pub phenotype_variety_id: Option<Uuid>,
    pub genotype_variety_id: Option<Uuid>,
    pub blood_type_id: Option<Uuid>,
    pub genetic_code: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateMedicalTestRequest {
    pub test_name: String,
    pub test_date: Option<NaiveDate>,
    pub result: String,
    pub certificate_url: Option<String>,
}

pub fn validate_create_cat(req: &CreateCatRequest) -> Result<(), AppError> {
    validate_name("Name", &req.name)
}

pub fn validate_update_cat(req: &UpdateCatRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_name("Name", name)?;
    }
    Ok(())
}

pub fn validate_create_medical_test(req: &CreateMedicalTestRequest) -> Result<(), AppError> {
    validate_name("Test name", &req.test_name)?;
    if req.result.trim().is_empty() {
        return Err(AppError::Validation("Result must not be empty".into()));
    }
    Ok(())
}

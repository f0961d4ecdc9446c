use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cat::ImageResponse;
use super::shared::{double_option, validate_name};
use crate::entity::achievement;
use crate::error::AppError;

/// An achievement with its images in display order.
#[derive(Clone, Debug, PartialEq, Serialize, utoipa::ToSchema)]
pub struct AchievementDetails {
    pub id: Uuid,
    #[schema(example = "Best in Show, Prague 2024")]
    pub title: String,
    pub description: Option<String>,
    pub achieved_on: Option<NaiveDate>,
    pub images: Vec<ImageResponse>,
}

impl AchievementDetails {
    pub fn bare(m: achievement::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            achieved_on: m.achieved_on,
            images: Vec::new(),
        }
    }
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateAchievementRequest {
    pub title: String,
    pub description: Option<String>,
    pub achieved_on: Option<NaiveDate>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateAchievementRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<NaiveDate>)]
    pub achieved_on: Option<Option<NaiveDate>>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AttachAchievementImageRequest {
    /// Public URL of a gallery image.
    pub url: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct SwapImagesRequest {
    pub first_image_id: Uuid,
    pub second_image_id: Uuid,
}

pub fn validate_create_achievement(req: &CreateAchievementRequest) -> Result<(), AppError> {
    validate_name("Title", &req.title)
}

pub fn validate_update_achievement(req: &UpdateAchievementRequest) -> Result<(), AppError> {
    if let Some(ref title) = req.title {
        validate_name("Title", title)?;
    }
    Ok(())
}

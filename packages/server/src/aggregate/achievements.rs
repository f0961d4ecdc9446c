use std::collections::HashMap;

use sea_orm::sea_query::NullOrdering;
use sea_orm::*;
use tracing::{error, instrument};
use uuid::Uuid;

use super::ordering::order_achievement_images;
use crate::entity::{achievement, image};
use crate::models::achievement::AchievementDetails;
use crate::models::cat::ImageResponse;

/// Every achievement, most recent first, with its images.
#[instrument(skip(db))]
pub async fn try_fetch_achievements<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<AchievementDetails>, DbErr> {
    let achievements = achievement::Entity::find()
        .order_by_with_nulls(
            achievement::Column::AchievedOn,
            Order::Desc,
            NullOrdering::Last,
        )
        .order_by_desc(achievement::Column::CreatedAt)
        .order_by_asc(achievement::Column::Id)
        .all(db)
        .await?;

    attach_images(db, achievements).await
}

pub async fn fetch_achievements<C: ConnectionTrait>(db: &C) -> Vec<AchievementDetails> {
    match try_fetch_achievements(db).await {
        Ok(achievements) => achievements,
        Err(e) => {
            error!(error = %e, "Failed to fetch achievements");
            Vec::new()
        }
    }
}

pub async fn try_fetch_achievement<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<AchievementDetails>, DbErr> {
    let Some(row) = achievement::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };
    Ok(attach_images(db, vec![row]).await?.into_iter().next())
}

async fn attach_images<C: ConnectionTrait>(
    db: &C,
    achievements: Vec<achievement::Model>,
) -> Result<Vec<AchievementDetails>, DbErr> {
    if achievements.is_empty() {
        return Ok(Vec::new());
    }

    let images = image::Entity::find()
        .filter(image::Column::AchievementId.is_in(achievements.iter().map(|a| a.id)))
        .all(db)
        .await?;

    let mut by_achievement: HashMap<Uuid, Vec<image::Model>> = HashMap::new();
    for img in images {
        if let Some(id) = img.achievement_id {
            by_achievement.entry(id).or_default().push(img);
        }
    }

    Ok(achievements
        .into_iter()
        .map(|row| {
            let mut images = by_achievement.remove(&row.id).unwrap_or_default();
            order_achievement_images(&mut images);
            let mut details = AchievementDetails::bare(row);
            details.images = images.into_iter().map(ImageResponse::from).collect();
            details
        })
        .collect())
}

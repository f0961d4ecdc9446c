//! Image-table writes. Every multi-statement change runs in one transaction;
//! the partial unique indexes created by `seed::ensure_indexes` reject a
//! second primary image per owner.

use chrono::Utc;
use sea_orm::prelude::Expr;
use sea_orm::*;
use tracing::{info, instrument};
use uuid::Uuid;

use super::GalleryError;
use crate::aggregate::ordering::{next_display_order, order_achievement_images, order_cat_images};
use crate::entity::{achievement, cat, image};

async fn find_by_url<C: ConnectionTrait>(
    db: &C,
    url: &str,
) -> Result<Option<image::Model>, DbErr> {
    image::Entity::find()
        .filter(image::Column::Url.eq(url))
        .one(db)
        .await
}

async fn cat_images<C: ConnectionTrait>(db: &C, cat_id: Uuid) -> Result<Vec<image::Model>, DbErr> {
    image::Entity::find()
        .filter(image::Column::CatId.eq(cat_id))
        .all(db)
        .await
}

async fn achievement_images<C: ConnectionTrait>(
    db: &C,
    achievement_id: Uuid,
) -> Result<Vec<image::Model>, DbErr> {
    image::Entity::find()
        .filter(image::Column::AchievementId.eq(achievement_id))
        .all(db)
        .await
}

/// Clear the primary flag on every image of the owner matched by `owner`.
async fn clear_primary<C: ConnectionTrait>(db: &C, owner: Condition) -> Result<(), DbErr> {
    image::Entity::update_many()
        .col_expr(image::Column::IsPrimary, Expr::value(false))
        .filter(owner)
        .filter(image::Column::IsPrimary.eq(true))
        .exec(db)
        .await?;
    Ok(())
}

/// Make the first image in display order primary if the cat has images but
/// none of them is primary.
async fn promote_first_cat_image<C: ConnectionTrait>(
    db: &C,
    cat_id: Uuid,
) -> Result<(), DbErr> {
    let mut images = cat_images(db, cat_id).await?;
    if images.is_empty() || images.iter().any(|i| i.is_primary) {
        return Ok(());
    }
    order_cat_images(&mut images);
    let first = images.swap_remove(0);
    let first_id = first.id;
    let mut active: image::ActiveModel = first.into();
    active.is_primary = Set(true);
    active.update(db).await?;
    info!(%cat_id, image_id = %first_id, "Promoted image to primary");
    Ok(())
}

async fn promote_first_achievement_image<C: ConnectionTrait>(
    db: &C,
    achievement_id: Uuid,
) -> Result<(), DbErr> {
    let mut images = achievement_images(db, achievement_id).await?;
    if images.is_empty() || images.iter().any(|i| i.is_primary) {
        return Ok(());
    }
    order_achievement_images(&mut images);
    let first = images.swap_remove(0);
    let first_id = first.id;
    let mut active: image::ActiveModel = first.into();
    active.is_primary = Set(true);
    active.update(db).await?;
    info!(%achievement_id, image_id = %first_id, "Promoted image to primary");
    Ok(())
}

/// Give the former owner of `previous` a new primary image if `previous` was
/// its primary and has since been moved or deleted.
pub(super) async fn replace_lost_primary<C: ConnectionTrait>(
    db: &C,
    previous: &image::Model,
) -> Result<(), DbErr> {
    if !previous.is_primary {
        return Ok(());
    }
    if let Some(cat_id) = previous.cat_id {
        promote_first_cat_image(db, cat_id).await?;
    }
    if let Some(achievement_id) = previous.achievement_id {
        promote_first_achievement_image(db, achievement_id).await?;
    }
    Ok(())
}

/// Attach the image at `url` to a cat, creating its metadata row if needed.
///
/// The cat's first image becomes primary. With `make_primary` the image
/// replaces the cat's current primary image.
#[instrument(skip(db))]
pub async fn assign_image_to_cat(
    db: &DatabaseConnection,
    url: &str,
    cat_id: Uuid,
    make_primary: bool,
) -> Result<image::Model, GalleryError> {
    let txn = db.begin().await?;

    if cat::Entity::find_by_id(cat_id).one(&txn).await?.is_none() {
        return Err(GalleryError::OwnerNotFound(format!("Cat {cat_id}")));
    }

    let existing = find_by_url(&txn, url).await?;
    let siblings: Vec<image::Model> = cat_images(&txn, cat_id)
        .await?
        .into_iter()
        .filter(|i| i.url != url)
        .collect();
    let primary = make_primary || siblings.is_empty();
    if primary {
        clear_primary(&txn, Condition::all().add(image::Column::CatId.eq(cat_id))).await?;
    }

    let saved = match existing {
        Some(row) => {
            let previous = row.clone();
            let keep_order = row.cat_id == Some(cat_id) && row.display_order.is_some();
            let keep_primary = row.cat_id == Some(cat_id) && row.is_primary;

            let mut active: image::ActiveModel = row.into();
            active.cat_id = Set(Some(cat_id));
            active.achievement_id = Set(None);
            active.is_primary = Set(primary || keep_primary);
            if !keep_order {
                active.display_order = Set(Some(next_display_order(&siblings)));
            }
            let saved = active.update(&txn).await?;

            replace_lost_primary(&txn, &previous).await?;
            saved
        }
        None => {
            image::ActiveModel {
                id: Set(Uuid::now_v7()),
                url: Set(url.to_string()),
                title: Set(None),
                description: Set(None),
                is_primary: Set(primary),
                display_order: Set(Some(next_display_order(&siblings))),
                cat_id: Set(Some(cat_id)),
                achievement_id: Set(None),
                created_at: Set(Utc::now()),
            }
            .insert(&txn)
            .await?
        }
    };

    txn.commit().await?;
    info!(image_id = %saved.id, %cat_id, is_primary = saved.is_primary, "Assigned image to cat");
    Ok(saved)
}

/// Detach the image at `url` from its cat or achievement. If it was the
/// primary image, the owner's first remaining image is promoted.
#[instrument(skip(db))]
pub async fn unassign_image(db: &DatabaseConnection, url: &str) -> Result<image::Model, GalleryError> {
    let txn = db.begin().await?;

    let row = find_by_url(&txn, url)
        .await?
        .ok_or_else(|| GalleryError::ImageNotFound(format!("'{url}'")))?;
    let previous = row.clone();

    let mut active: image::ActiveModel = row.into();
    active.cat_id = Set(None);
    active.achievement_id = Set(None);
    active.is_primary = Set(false);
    let saved = active.update(&txn).await?;

    replace_lost_primary(&txn, &previous).await?;

    txn.commit().await?;
    Ok(saved)
}

/// Make an image the single primary image of its owner.
#[instrument(skip(db))]
pub async fn set_primary_image(
    db: &DatabaseConnection,
    image_id: Uuid,
) -> Result<image::Model, GalleryError> {
    let txn = db.begin().await?;

    let row = image::Entity::find_by_id(image_id)
        .one(&txn)
        .await?
        .ok_or_else(|| GalleryError::ImageNotFound(image_id.to_string()))?;

    let owner = match (row.cat_id, row.achievement_id) {
        (Some(cat_id), _) => Condition::all().add(image::Column::CatId.eq(cat_id)),
        (None, Some(achievement_id)) => {
            Condition::all().add(image::Column::AchievementId.eq(achievement_id))
        }
        (None, None) => return Err(GalleryError::Unassigned(image_id)),
    };
    clear_primary(&txn, owner).await?;

    let mut active: image::ActiveModel = row.into();
    active.is_primary = Set(true);
    let saved = active.update(&txn).await?;

    txn.commit().await?;
    Ok(saved)
}

/// Attach the image at `url` to an achievement, after its existing images.
#[instrument(skip(db))]
pub async fn attach_image_to_achievement(
    db: &DatabaseConnection,
    achievement_id: Uuid,
    url: &str,
) -> Result<image::Model, GalleryError> {
    let txn = db.begin().await?;

    if achievement::Entity::find_by_id(achievement_id)
        .one(&txn)
        .await?
        .is_none()
    {
        return Err(GalleryError::OwnerNotFound(format!(
            "Achievement {achievement_id}"
        )));
    }

    let siblings: Vec<image::Model> = achievement_images(&txn, achievement_id)
        .await?
        .into_iter()
        .filter(|i| i.url != url)
        .collect();
    let order = next_display_order(&siblings);
    let primary = siblings.is_empty();

    let saved = match find_by_url(&txn, url).await? {
        Some(row) if row.achievement_id == Some(achievement_id) => row,
        Some(row) => {
            let previous = row.clone();

            let mut active: image::ActiveModel = row.into();
            active.cat_id = Set(None);
            active.achievement_id = Set(Some(achievement_id));
            active.is_primary = Set(primary);
            active.display_order = Set(Some(order));
            let saved = active.update(&txn).await?;

            replace_lost_primary(&txn, &previous).await?;
            saved
        }
        None => {
            image::ActiveModel {
                id: Set(Uuid::now_v7()),
                url: Set(url.to_string()),
                title: Set(None),
                description: Set(None),
                is_primary: Set(primary),
                display_order: Set(Some(order)),
                cat_id: Set(None),
                achievement_id: Set(Some(achievement_id)),
                created_at: Set(Utc::now()),
            }
            .insert(&txn)
            .await?
        }
    };

    txn.commit().await?;
    Ok(saved)
}

/// Swap the display positions of two images of the same achievement.
///
/// Images without a `display_order` are numbered first, in their current
/// display order, so the swap is always visible.
#[instrument(skip(db))]
pub async fn swap_display_order(
    db: &DatabaseConnection,
    achievement_id: Uuid,
    first_id: Uuid,
    second_id: Uuid,
) -> Result<(), GalleryError> {
    let txn = db.begin().await?;

    let mut images = achievement_images(&txn, achievement_id).await?;
    for id in [first_id, second_id] {
        if !images.iter().any(|i| i.id == id) {
            return match image::Entity::find_by_id(id).one(&txn).await? {
                Some(_) => Err(GalleryError::OwnerMismatch),
                None => Err(GalleryError::ImageNotFound(id.to_string())),
            };
        }
    }

    order_achievement_images(&mut images);
    let mut next = next_display_order(&images);
    let mut orders = Vec::with_capacity(images.len());
    for img in &images {
        let order = img.display_order.unwrap_or_else(|| {
            let assigned = next;
            next += 1;
            assigned
        });
        orders.push((img.id, img.display_order, order));
    }

    let order_of = |id: Uuid| {
        orders
            .iter()
            .find(|(i, _, _)| *i == id)
            .map(|(_, _, o)| *o)
            .unwrap_or_default()
    };
    let (first_order, second_order) = (order_of(first_id), order_of(second_id));

    for (id, stored, order) in &orders {
        let target = if *id == first_id {
            second_order
        } else if *id == second_id {
            first_order
        } else {
            *order
        };
        if *stored != Some(target) {
            image::Entity::update_many()
                .col_expr(image::Column::DisplayOrder, Expr::value(target))
                .filter(image::Column::Id.eq(*id))
                .exec(&txn)
                .await?;
        }
    }

    txn.commit().await?;
    Ok(())
}

/// Set title and description of the image at `url`, creating an unassigned
/// metadata row if none exists.
#[instrument(skip(db, title, description))]
pub async fn update_image_metadata(
    db: &DatabaseConnection,
    url: &str,
    title: Option<String>,
    description: Option<String>,
) -> Result<image::Model, GalleryError> {
    let saved = match find_by_url(db, url).await? {
        Some(row) => {
            let mut active: image::ActiveModel = row.into();
            active.title = Set(title);
            active.description = Set(description);
            active.update(db).await?
        }
        None => {
            image::ActiveModel {
                id: Set(Uuid::now_v7()),
                url: Set(url.to_string()),
                title: Set(title),
                description: Set(description),
                is_primary: Set(false),
                display_order: Set(None),
                cat_id: Set(None),
                achievement_id: Set(None),
                created_at: Set(Utc::now()),
            }
            .insert(db)
            .await?
        }
    };
    Ok(saved)
}

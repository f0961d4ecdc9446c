use sea_orm::prelude::Expr;
use sea_orm::sea_query::SimpleExpr;
use sea_orm::*;
use tracing::{error, instrument, warn};
use uuid::Uuid;

use super::join::{CatRelations, Lookups, join_cats};
use crate::entity::{
    CatStatus, Gender, blood_type, cat, cat_blood_type, cat_color, cat_variety, color,
    genetic_test, image, medical_test, variety,
};
use crate::models::cat::CatDetails;

/// Which cats to aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatFilter {
    pub gender: Option<Gender>,
    pub status: Option<CatStatus>,
    pub breeding_only: bool,
    pub own_breeding_only: bool,
}

impl CatFilter {
    /// Every cat.
    pub fn all() -> Self {
        Self::default()
    }

    /// Cats shown on the public breeding page: alive, bred by the cattery and
    /// currently used for breeding.
    pub fn breeding(gender: Option<Gender>) -> Self {
        Self {
            gender,
            status: Some(CatStatus::Alive),
            breeding_only: true,
            own_breeding_only: true,
        }
    }

    fn condition(&self) -> Condition {
        let mut cond = Condition::all();
        if let Some(gender) = self.gender {
            cond = cond.add(cat::Column::Gender.eq(gender));
        }
        if let Some(status) = self.status {
            cond = cond.add(cat::Column::Status.eq(status));
        }
        if self.breeding_only {
            cond = cond.add(cat::Column::IsBreeding.eq(true));
        }
        if self.own_breeding_only {
            cond = cond.add(cat::Column::IsOwnBreedingCat.eq(true));
        }
        cond
    }
}

/// Cats matching `filter`, ordered by name, with every relation joined.
#[instrument(skip(db))]
pub async fn try_fetch_cats_with_details<C: ConnectionTrait>(
    db: &C,
    filter: &CatFilter,
) -> Result<Vec<CatDetails>, DbErr> {
    let cats = cat::Entity::find()
        .filter(filter.condition())
        .order_by_asc(cat::Column::Name)
        .order_by_asc(cat::Column::Id)
        .all(db)
        .await?;

    enrich_cats(db, cats).await
}

/// Like [`try_fetch_cats_with_details`], but logs failures and returns an
/// empty list.
pub async fn fetch_cats_with_details<C: ConnectionTrait>(
    db: &C,
    filter: &CatFilter,
) -> Vec<CatDetails> {
    match try_fetch_cats_with_details(db, filter).await {
        Ok(cats) => cats,
        Err(e) => {
            error!(error = %e, ?filter, "Failed to fetch cats");
            Vec::new()
        }
    }
}

/// Cats with the given IDs, ordered by name. Unknown IDs are skipped.
pub async fn try_fetch_cats_by_ids<C: ConnectionTrait>(
    db: &C,
    ids: &[Uuid],
) -> Result<Vec<CatDetails>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let cats = cat::Entity::find()
        .filter(cat::Column::Id.is_in(ids.iter().copied()))
        .order_by_asc(cat::Column::Name)
        .order_by_asc(cat::Column::Id)
        .all(db)
        .await?;

    enrich_cats(db, cats).await
}

pub async fn try_fetch_cat<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<CatDetails>, DbErr> {
    Ok(try_fetch_cats_by_ids(db, &[id]).await?.into_iter().next())
}

async fn enrich_cats<C: ConnectionTrait>(
    db: &C,
    cats: Vec<cat::Model>,
) -> Result<Vec<CatDetails>, DbErr> {
    if cats.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = cats.iter().map(|c| c.id).collect();

    let (images, colors, varieties, blood_types, genetic_tests, medical_tests) = tokio::try_join!(
        image::Entity::find()
            .filter(image::Column::CatId.is_in(ids.iter().copied()))
            .all(db),
        cat_color::Entity::find()
            .filter(cat_color::Column::CatId.is_in(ids.iter().copied()))
            .order_by_asc(cat_color::Column::Id)
            .all(db),
        cat_variety::Entity::find()
            .filter(cat_variety::Column::CatId.is_in(ids.iter().copied()))
            .order_by_asc(cat_variety::Column::Id)
            .all(db),
        cat_blood_type::Entity::find()
            .filter(cat_blood_type::Column::CatId.is_in(ids.iter().copied()))
            .all(db),
        genetic_test::Entity::find()
            .filter(genetic_test::Column::CatId.is_in(ids.iter().copied()))
            .order_by_desc(genetic_test::Column::CreatedAt)
            .all(db),
        medical_test::Entity::find()
            .filter(medical_test::Column::CatId.is_in(ids.iter().copied()))
            .all(db),
    )?;

    let relations = CatRelations {
        images,
        colors,
        varieties,
        blood_types,
        genetic_tests,
        medical_tests,
    };

    let (color_ids, variety_ids, blood_type_ids) = relations.lookup_ids();
    let (colors, varieties, blood_types) = tokio::try_join!(
        async {
            if color_ids.is_empty() {
                return Ok(Vec::new());
            }
            color::Entity::find()
                .filter(color::Column::Id.is_in(color_ids.iter().copied()))
                .all(db)
                .await
        },
        async {
            if variety_ids.is_empty() {
                return Ok(Vec::new());
            }
            variety::Entity::find()
                .filter(variety::Column::Id.is_in(variety_ids.iter().copied()))
                .all(db)
                .await
        },
        async {
            if blood_type_ids.is_empty() {
                return Ok(Vec::new());
            }
            blood_type::Entity::find()
                .filter(blood_type::Column::Id.is_in(blood_type_ids.iter().copied()))
                .all(db)
                .await
        },
    )?;

    let lookups = Lookups::new(colors, varieties, blood_types);
    let joined = join_cats(cats, relations, &lookups);
    persist_display_orders(db, &joined.order_assignments).await;

    Ok(joined.cats)
}

/// Store lazily assigned `display_order` values in one statement. Failures
/// are logged and skipped.
async fn persist_display_orders<C: ConnectionTrait>(db: &C, assignments: &[(Uuid, i32)]) {
    let Some((&(first_id, first_order), rest)) = assignments.split_first() else {
        return;
    };
    let orders = rest
        .iter()
        .fold(
            Expr::case(image::Column::Id.eq(first_id), Expr::value(first_order)),
            |case, &(image_id, order)| case.case(image::Column::Id.eq(image_id), Expr::value(order)),
        )
        .finally(Expr::col(image::Column::DisplayOrder));

    let result = image::Entity::update_many()
        .col_expr(image::Column::DisplayOrder, Into::<SimpleExpr>::into(orders))
        .filter(image::Column::Id.is_in(assignments.iter().map(|&(image_id, _)| image_id)))
        .filter(image::Column::DisplayOrder.is_null())
        .exec(db)
        .await;
    if let Err(e) = result {
        warn!(images = assignments.len(), error = %e, "Failed to persist image display orders");
    }
}

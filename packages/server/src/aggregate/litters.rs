use sea_orm::sea_query::NullOrdering;
use sea_orm::*;
use tracing::{error, instrument};
use uuid::Uuid;

use super::cats::try_fetch_cats_by_ids;
use super::join::{join_litters, litter_cat_ids};
use crate::entity::{LitterStatus, cat_litter, litter};
use crate::models::litter::LitterDetails;

/// Planned litters by expected date (soonest first); born litters by birth
/// date (newest first). Undated litters sort last.
fn litters_query(status: LitterStatus) -> Select<litter::Entity> {
    let select = litter::Entity::find().filter(litter::Column::Status.eq(status));
    let select = match status {
        LitterStatus::Planned => select.order_by_with_nulls(
            litter::Column::ExpectedDate,
            Order::Asc,
            NullOrdering::Last,
        ),
        LitterStatus::Current | LitterStatus::Past => select.order_by_with_nulls(
            litter::Column::BirthDate,
            Order::Desc,
            NullOrdering::Last,
        ),
    };
    select.order_by_asc(litter::Column::Id)
}

/// Litters with the given status, parents and kittens joined.
///
/// Litters whose parents no longer exist are returned with `mother`/`father`
/// unset; see [`super::retain_complete_litters`].
#[instrument(skip(db))]
pub async fn try_fetch_litters_by_status<C: ConnectionTrait>(
    db: &C,
    status: LitterStatus,
    limit: Option<u64>,
) -> Result<Vec<LitterDetails>, DbErr> {
    let litters = litters_query(status).limit(limit).all(db).await?;
    enrich_litters(db, litters).await
}

pub async fn fetch_litters_by_status<C: ConnectionTrait>(
    db: &C,
    status: LitterStatus,
    limit: Option<u64>,
) -> Vec<LitterDetails> {
    match try_fetch_litters_by_status(db, status, limit).await {
        Ok(litters) => litters,
        Err(e) => {
            error!(error = %e, ?status, "Failed to fetch litters");
            Vec::new()
        }
    }
}

/// One page of litters with the given status and the total litter count for
/// that status. `page` is 1-based.
#[instrument(skip(db))]
pub async fn try_fetch_litters_page<C: ConnectionTrait>(
    db: &C,
    status: LitterStatus,
    page: u64,
    per_page: u64,
) -> Result<(Vec<LitterDetails>, u64), DbErr> {
    let total = litter::Entity::find()
        .filter(litter::Column::Status.eq(status))
        .count(db)
        .await?;

    // Pages past the addressable range are empty.
    let Some(offset) = page.saturating_sub(1).checked_mul(per_page) else {
        return Ok((Vec::new(), total));
    };

    let litters = litters_query(status)
        .offset(Some(offset))
        .limit(Some(per_page))
        .all(db)
        .await?;

    Ok((enrich_litters(db, litters).await?, total))
}

/// A single litter, parents and kittens joined, whether or not its parents
/// still exist.
pub async fn try_fetch_litter<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<LitterDetails>, DbErr> {
    let Some(row) = litter::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };
    Ok(enrich_litters(db, vec![row]).await?.into_iter().next())
}

async fn enrich_litters<C: ConnectionTrait>(
    db: &C,
    litters: Vec<litter::Model>,
) -> Result<Vec<LitterDetails>, DbErr> {
    if litters.is_empty() {
        return Ok(Vec::new());
    }

    let memberships = cat_litter::Entity::find()
        .filter(cat_litter::Column::LitterId.is_in(litters.iter().map(|l| l.id)))
        .all(db)
        .await?;

    let cat_ids = litter_cat_ids(&litters, &memberships);
    let cats = try_fetch_cats_by_ids(db, &cat_ids).await?;

    Ok(join_litters(litters, &memberships, cats))
}

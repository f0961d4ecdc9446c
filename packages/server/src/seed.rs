use sea_orm::sea_query::{Index, OnConflict, PostgresQueryBuilder};
use sea_orm::*;
use tracing::{info, warn};
use uuid::Uuid;

use crate::entity::{blood_type, image, litter};

/// Feline blood types seeded on startup.
const DEFAULT_BLOOD_TYPES: &[&str] = &["A", "B", "AB"];

/// Seed the `blood_type` lookup table. Existing names are left untouched.
pub async fn seed_blood_types(db: &DatabaseConnection) -> Result<(), DbErr> {
    let mut inserted = 0u32;
    for &name in DEFAULT_BLOOD_TYPES {
        let model = blood_type::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name.to_string()),
        };

        let result = blood_type::Entity::insert(model)
            .on_conflict(
                OnConflict::column(blood_type::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(n) if n > 0 => inserted += 1,
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if inserted > 0 {
        info!("Seeded {} new blood types", inserted);
    }

    Ok(())
}

/// Partial unique indexes allowing one primary image per owner. Schema sync
/// cannot express `WHERE` clauses, so they are created with raw SQL.
const PRIMARY_IMAGE_INDEXES: &[(&str, &str)] = &[
    (
        "idx_image_cat_primary",
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_image_cat_primary \
         ON image (cat_id) WHERE is_primary AND cat_id IS NOT NULL",
    ),
    (
        "idx_image_achievement_primary",
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_image_achievement_primary \
         ON image (achievement_id) WHERE is_primary AND achievement_id IS NOT NULL",
    ),
];

async fn execute_index(db: &DatabaseConnection, name: &str, stmt: &str) {
    match db.execute_unprepared(stmt).await {
        Ok(_) => info!("Ensured index {} exists", name),
        Err(e) => warn!("Failed to create index {}: {}", name, e),
    }
}

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't create composite or partial indexes, so we
/// create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    for &(name, stmt) in PRIMARY_IMAGE_INDEXES {
        execute_index(db, name, stmt).await;
    }

    // Per-cat image lookups during aggregation.
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_image_cat_order")
        .table(image::Entity)
        .col(image::Column::CatId)
        .col(image::Column::DisplayOrder)
        .to_string(PostgresQueryBuilder);
    execute_index(db, "idx_image_cat_order", &stmt).await;

    // Litter listings: WHERE status = ? ORDER BY birth_date
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_litter_status_birth")
        .table(litter::Entity)
        .col(litter::Column::Status)
        .col(litter::Column::BirthDate)
        .to_string(PostgresQueryBuilder);
    execute_index(db, "idx_litter_status_birth", &stmt).await;

    Ok(())
}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Metadata for a stored image. `url` is the cross-reference key between the
/// object store and this table.
///
/// An image is owned by at most one of a cat or an achievement.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "image")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub url: String,

    pub title: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    #[sea_orm(default_value = false)]
    pub is_primary: bool,
    pub display_order: Option<i32>,

    pub cat_id: Option<Uuid>,
    pub achievement_id: Option<Uuid>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

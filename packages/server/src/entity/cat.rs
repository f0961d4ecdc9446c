use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::enums::{CatStatus, Gender};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cat")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,
    pub birth_date: Option<Date>,
    pub gender: Gender,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub details: Option<String>,

    pub is_breeding: bool,
    pub is_neutered: bool,
    /// Bred by the cattery itself (as opposed to an imported stud or queen).
    pub is_own_breeding_cat: bool,
    pub status: CatStatus,

    pub pedigree_link: Option<String>,
    pub youtube_video_link: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

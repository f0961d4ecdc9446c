use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::enums::LitterStatus;

/// Parents are plain IDs without a foreign key; a litter may outlive a
/// deleted parent and is then hidden from listings.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "litter")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub mother_id: Uuid,
    pub father_id: Uuid,

    pub birth_date: Option<Date>,
    /// Set for planned litters.
    pub expected_date: Option<Date>,

    pub number_of_kittens: Option<i32>,
    pub number_of_males: Option<i32>,
    pub number_of_females: Option<i32>,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub details: Option<String>,

    pub status: LitterStatus,
    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

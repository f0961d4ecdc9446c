use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cat_blood_type")]
pub struct Model {
    /// One blood type per cat.
    #[sea_orm(primary_key, auto_increment = false)]
    pub cat_id: Uuid,
    pub blood_type_id: Uuid,
}

impl ActiveModelBehavior for ActiveModel {}

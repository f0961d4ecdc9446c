use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cat_litter")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub cat_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub litter_id: Uuid,
}

impl ActiveModelBehavior for ActiveModel {}

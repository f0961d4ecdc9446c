use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cat_variety")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cat_id: Uuid,
    pub variety_id: Uuid,
    pub is_phenotype: bool,
    pub is_genotype: bool,
}

impl ActiveModelBehavior for ActiveModel {}

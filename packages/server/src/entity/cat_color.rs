use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Links a cat to a color. A cat usually has one phenotype row (what it looks
/// like) and optionally one genotype row (what it carries).
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cat_color")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cat_id: Uuid,
    pub color_id: Uuid,
    pub is_phenotype: bool,
    pub is_genotype: bool,
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    DeriveActiveEnum,
    EnumIter,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[sea_orm(string_value = "male")]
    Male,
    #[sea_orm(string_value = "female")]
    Female,
}

/// Lifecycle status of a cat.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    DeriveActiveEnum,
    EnumIter,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum CatStatus {
    #[sea_orm(string_value = "alive")]
    Alive,
    #[sea_orm(string_value = "sold")]
    Sold,
    #[sea_orm(string_value = "reserved")]
    Reserved,
    #[sea_orm(string_value = "deceased")]
    Deceased,
    /// Kept back while its suitability for breeding is assessed.
    #[sea_orm(string_value = "under_breeding_evaluation")]
    UnderBreedingEvaluation,
    #[sea_orm(string_value = "preliminarily_reserved")]
    PreliminarilyReserved,
}

/// Planned litters are not born yet; current ones have kittens available;
/// past ones are historical.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    DeriveActiveEnum,
    EnumIter,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum LitterStatus {
    #[sea_orm(string_value = "planned")]
    Planned,
    #[sea_orm(string_value = "current")]
    Current,
    #[sea_orm(string_value = "past")]
    Past,
}

use serde::{Deserialize, Serialize};

use super::cat::{BloodTypeResponse, ColorResponse, VarietyResponse};

/// Every lookup table, for populating admin forms.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LookupsResponse {
    pub colors: Vec<ColorResponse>,
    pub varieties: Vec<VarietyResponse>,
    pub blood_types: Vec<BloodTypeResponse>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateColorRequest {
    pub name: String,
    pub code: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateVarietyRequest {
    pub name: String,
    pub description: Option<String>,
}

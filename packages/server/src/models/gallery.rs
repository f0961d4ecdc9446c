use chrono::{DateTime, Utc};
use common::storage::{SortColumn, SortOrder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GalleryItemType {
    Folder,
    Image,
}

/// A storage listing entry merged with its image row, if one exists.
#[derive(Clone, Debug, PartialEq, Serialize, utoipa::ToSchema)]
pub struct GalleryItem {
    /// Name within the listed folder.
    #[schema(example = "luna.jpg")]
    pub name: String,
    /// Full object path from the bucket root.
    #[schema(example = "cats/luna.jpg")]
    pub path: String,
    #[serde(rename = "type")]
    pub item_type: GalleryItemType,
    /// Public URL; images only.
    pub url: Option<String>,
    pub size: Option<u64>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Image row ID; `null` until the image has metadata.
    pub id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_primary: bool,
    pub cat_id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct GalleryPage {
    pub items: Vec<GalleryItem>,
    pub page: u64,
    pub total_pages: u64,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GalleryQuery {
    /// Folder to list. The bucket root when omitted.
    #[serde(default)]
    pub path: String,
    /// 1-based page number. Default 1.
    pub page: Option<u64>,
    /// Entries per page, 1-100. Default 24.
    pub page_size: Option<u64>,
    /// One of `name` (default), `created_at`, `updated_at`.
    #[param(value_type = Option<String>)]
    pub sort_by: Option<SortColumn>,
    /// `asc` (default) or `desc`.
    #[param(value_type = Option<String>)]
    pub sort_order: Option<SortOrder>,
    pub search: Option<String>,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PathQuery {
    pub path: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateFolderRequest {
    #[schema(example = "cats/luna")]
    pub path: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct RenameFolderRequest {
    pub from: String,
    pub to: String,
}

/// Outcome of a folder rename or delete.
#[derive(Serialize, utoipa::ToSchema)]
pub struct FolderOperationResponse {
    /// Number of objects moved or removed.
    pub objects: usize,
    /// Number of image rows rewritten or deleted.
    pub images: u64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    pub path: String,
    pub url: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AssignImageRequest {
    pub url: String,
    pub cat_id: Uuid,
    #[serde(default)]
    pub make_primary: bool,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UnassignImageRequest {
    pub url: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ImageMetadataRequest {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

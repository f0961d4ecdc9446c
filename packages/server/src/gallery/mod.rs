//! Gallery directory resolver: object store listings merged with image
//! metadata, plus the folder and image-assignment mutations behind the admin
//! gallery.

mod classify;
mod folders;
mod mutations;
mod resolver;

use common::storage::StorageError;
use sea_orm::DbErr;
use uuid::Uuid;

pub use classify::{classify_entry, is_image_name};
pub use folders::{create_folder, delete_folder, delete_image, rename_folder, upload_image};
pub use mutations::{
    assign_image_to_cat, attach_image_to_achievement, set_primary_image, swap_display_order,
    unassign_image, update_image_metadata,
};
pub use resolver::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, list_gallery};

#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("database error: {0}")]
    Db(#[from] DbErr),

    #[error("image {0} not found")]
    ImageNotFound(String),

    #[error("{0} not found")]
    OwnerNotFound(String),

    #[error("'{0}' is not an image file")]
    NotAnImage(String),

    #[error("images belong to different owners")]
    OwnerMismatch,

    #[error("image {0} is not assigned to a cat or achievement")]
    Unassigned(Uuid),

    #[error("folder '{0}' already exists")]
    FolderExists(String),

    #[error("invalid folder: {0}")]
    InvalidFolder(String),
}

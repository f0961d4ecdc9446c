mod error;
mod path;
mod traits;

pub mod filesystem;
#[cfg(feature = "object-storage")]
pub mod s3;

pub use error::StorageError;
pub use path::{join_path, normalize_path, public_object_url};
pub use traits::{ListOptions, ObjectEntry, ObjectStore, SortColumn, SortOrder};

/// Sentinel object that makes an otherwise empty folder visible in a listing.
pub const FOLDER_PLACEHOLDER: &str = ".emptyFolderPlaceholder";

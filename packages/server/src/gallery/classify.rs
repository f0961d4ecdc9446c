use common::storage::{FOLDER_PLACEHOLDER, ObjectEntry};
use mime_guess::mime;

use crate::models::gallery::GalleryItemType;

/// Whether the file name carries an image extension.
pub fn is_image_name(name: &str) -> bool {
    mime_guess::from_path(name)
        .iter()
        .any(|m| m.type_() == mime::IMAGE)
}

/// Classify a listing entry. An entry is an image only if its name has an
/// image extension and the store reported a size for it; everything else is
/// shown as a folder. Folder placeholders are hidden (`None`).
pub fn classify_entry(entry: &ObjectEntry) -> Option<GalleryItemType> {
    if entry.name == FOLDER_PLACEHOLDER {
        return None;
    }
    if entry.size.is_some() && is_image_name(&entry.name) {
        Some(GalleryItemType::Image)
    } else {
        Some(GalleryItemType::Folder)
    }
}

use common::storage::{
    FOLDER_PLACEHOLDER, ListOptions, ObjectStore, StorageError, join_path, normalize_path,
};
use sea_orm::prelude::Expr;
use sea_orm::*;
use tracing::{info, instrument};

use super::GalleryError;
use super::classify::is_image_name;
use super::mutations::replace_lost_primary;
use crate::entity::image;
use crate::models::gallery::{FolderOperationResponse, UploadResponse};
use crate::utils::filename::{check_folder, check_name, split_parent};

/// Normalize a folder path and reject the bucket root.
fn folder_path(path: &str) -> Result<String, GalleryError> {
    let folder = normalize_path(path)?;
    if folder.is_empty() {
        return Err(GalleryError::InvalidFolder(
            "the bucket root cannot be used here".into(),
        ));
    }
    Ok(folder)
}

async fn folder_exists(store: &dyn ObjectStore, folder: &str) -> Result<bool, StorageError> {
    let (parent, name) = split_parent(folder);
    let options = ListOptions {
        limit: 1000,
        search: Some(name.to_string()),
        ..Default::default()
    };
    let entries = store.list(parent, &options).await?;
    Ok(entries.iter().any(|e| e.is_folder() && e.name == name))
}

/// Create an empty folder by storing a placeholder object inside it.
#[instrument(skip(store))]
pub async fn create_folder(store: &dyn ObjectStore, path: &str) -> Result<String, GalleryError> {
    let folder = folder_path(path)?;
    check_folder(&folder).map_err(|e| GalleryError::InvalidFolder(e.to_string()))?;
    if folder_exists(store, &folder).await? {
        return Err(GalleryError::FolderExists(folder));
    }

    store
        .upload(&join_path(&folder, FOLDER_PLACEHOLDER), &[])
        .await?;
    info!(%folder, "Created gallery folder");
    Ok(folder)
}

/// Move every object below `from` to `to` and rewrite the matching image URLs.
///
/// Objects are copied before any is removed. A failure part way leaves the
/// copies made so far in place.
#[instrument(skip(store, db))]
pub async fn rename_folder(
    store: &dyn ObjectStore,
    db: &DatabaseConnection,
    from: &str,
    to: &str,
) -> Result<FolderOperationResponse, GalleryError> {
    let from = folder_path(from)?;
    let to = folder_path(to)?;
    if from == to || to.starts_with(&format!("{from}/")) {
        return Err(GalleryError::InvalidFolder(format!(
            "cannot move '{from}' into '{to}'"
        )));
    }
    check_folder(&to).map_err(|e| GalleryError::InvalidFolder(e.to_string()))?;
    if folder_exists(store, &to).await? {
        return Err(GalleryError::FolderExists(to));
    }

    let objects = store.list_recursive(&from).await?;
    if objects.is_empty() {
        return Err(StorageError::NotFound(from).into());
    }

    let mut moves = Vec::with_capacity(objects.len());
    for old_path in &objects {
        let suffix = old_path
            .strip_prefix(&from)
            .unwrap_or(old_path)
            .trim_start_matches('/');
        let new_path = join_path(&to, suffix);
        let data = store.download(old_path).await?;
        store.upload(&new_path, &data).await?;
        moves.push((old_path.clone(), new_path));
    }
    store.remove(&objects).await?;

    let txn = db.begin().await?;
    let mut images = 0;
    for (old_path, new_path) in &moves {
        let result = image::Entity::update_many()
            .col_expr(image::Column::Url, Expr::value(store.public_url(new_path)))
            .filter(image::Column::Url.eq(store.public_url(old_path)))
            .exec(&txn)
            .await?;
        images += result.rows_affected;
    }
    txn.commit().await?;

    info!(%from, %to, objects = moves.len(), images, "Renamed gallery folder");
    Ok(FolderOperationResponse {
        objects: moves.len(),
        images,
    })
}

/// Remove every object below `path` and the image rows pointing at them.
/// Owners that lose their primary image get their next image promoted.
#[instrument(skip(store, db))]
pub async fn delete_folder(
    store: &dyn ObjectStore,
    db: &DatabaseConnection,
    path: &str,
) -> Result<FolderOperationResponse, GalleryError> {
    let folder = folder_path(path)?;
    let objects = store.list_recursive(&folder).await?;
    if objects.is_empty() {
        return Err(StorageError::NotFound(folder).into());
    }
    store.remove(&objects).await?;

    let urls: Vec<String> = objects.iter().map(|p| store.public_url(p)).collect();
    let txn = db.begin().await?;
    let mut images = 0;
    let mut lost_primaries = Vec::new();
    for chunk in urls.chunks(500) {
        let primaries = image::Entity::find()
            .filter(image::Column::Url.is_in(chunk.iter().cloned()))
            .filter(image::Column::IsPrimary.eq(true))
            .all(&txn)
            .await?;
        lost_primaries.extend(primaries);

        let result = image::Entity::delete_many()
            .filter(image::Column::Url.is_in(chunk.iter().cloned()))
            .exec(&txn)
            .await?;
        images += result.rows_affected;
    }
    for previous in &lost_primaries {
        replace_lost_primary(&txn, previous).await?;
    }
    txn.commit().await?;

    info!(%folder, objects = objects.len(), images, "Deleted gallery folder");
    Ok(FolderOperationResponse {
        objects: objects.len(),
        images,
    })
}

/// Store an uploaded image as `{folder}/{file_name}`, replacing any existing
/// object at that path.
#[instrument(skip(store, data), fields(size = data.len()))]
pub async fn upload_image(
    store: &dyn ObjectStore,
    folder: &str,
    file_name: &str,
    data: &[u8],
) -> Result<UploadResponse, GalleryError> {
    let folder = normalize_path(folder)?;
    let file_name =
        check_name(file_name).map_err(|e| GalleryError::InvalidFolder(e.to_string()))?;
    if !is_image_name(file_name) {
        return Err(GalleryError::NotAnImage(file_name.to_string()));
    }

    let path = join_path(&folder, file_name);
    store.upload(&path, data).await?;
    Ok(UploadResponse {
        url: store.public_url(&path),
        path,
    })
}

/// Remove one image object and its metadata row. A removed primary image is
/// replaced by its owner's next image.
#[instrument(skip(store, db))]
pub async fn delete_image(
    store: &dyn ObjectStore,
    db: &DatabaseConnection,
    path: &str,
) -> Result<(), GalleryError> {
    let path = normalize_path(path)?;
    let (_, name) = split_parent(&path);
    if !is_image_name(name) {
        return Err(GalleryError::NotAnImage(name.to_string()));
    }

    let url = store.public_url(&path);
    let row = image::Entity::find()
        .filter(image::Column::Url.eq(url.as_str()))
        .one(db)
        .await?;

    store.remove(std::slice::from_ref(&path)).await?;

    if let Some(row) = row {
        let txn = db.begin().await?;
        image::Entity::delete_by_id(row.id).exec(&txn).await?;
        replace_lost_primary(&txn, &row).await?;
        txn.commit().await?;
    }
    Ok(())
}

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;

use super::error::StorageError;
use super::path::{normalize_path, public_object_url};
use super::traits::{ListOptions, ObjectEntry, ObjectStore, apply_list_options};

/// Filesystem-backed object store.
///
/// Objects live at `{base_path}/{object path}`; folders are plain directories.
/// Writes go through `{base_path}/.tmp` and are renamed into place.
pub struct FilesystemObjectStore {
    base_path: PathBuf,
    public_base_url: String,
    bucket: String,
}

impl FilesystemObjectStore {
    /// Create a new filesystem object store.
    pub async fn new(
        base_path: PathBuf,
        public_base_url: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            public_base_url: public_base_url.into(),
            bucket: bucket.into(),
        })
    }

    fn object_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        let normalized = normalize_path(path)?;
        Ok(self.base_path.join(normalized))
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }

    /// Remove now-empty directories between `dir` and the store root.
    async fn prune_empty_dirs(&self, mut dir: &Path) {
        while dir != self.base_path && dir.starts_with(&self.base_path) {
            if fs::remove_dir(dir).await.is_err() {
                break;
            }
            match dir.parent() {
                Some(parent) => dir = parent,
                None => break,
            }
        }
    }
}

fn to_utc(time: std::io::Result<std::time::SystemTime>) -> Option<DateTime<Utc>> {
    time.ok().map(DateTime::<Utc>::from)
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
    async fn list(
        &self,
        prefix: &str,
        options: &ListOptions,
    ) -> Result<Vec<ObjectEntry>, StorageError> {
        let dir = self.object_path(prefix)?;
        let mut read_dir = match fs::read_dir(&dir).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if dir == self.base_path && name == ".tmp" {
                continue;
            }
            let meta = entry.metadata().await?;
            entries.push(ObjectEntry {
                name,
                size: meta.is_file().then(|| meta.len()),
                created_at: if meta.is_file() { to_utc(meta.created()) } else { None },
                updated_at: if meta.is_file() { to_utc(meta.modified()) } else { None },
            });
        }

        Ok(apply_list_options(entries, options))
    }

    async fn upload(&self, path: &str, data: &[u8]) -> Result<(), StorageError> {
        let target = self.object_path(path)?;
        if target == self.base_path {
            return Err(StorageError::InvalidPath("object path is empty".into()));
        }

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = fs::rename(&temp_path, &target).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(())
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let target = self.object_path(path)?;
        match fs::read(&target).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, paths: &[String]) -> Result<(), StorageError> {
        for path in paths {
            let target = self.object_path(path)?;
            match fs::remove_file(&target).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
            // Object stores have no empty directories; mirror that here.
            if let Some(parent) = target.parent() {
                self.prune_empty_dirs(parent).await;
            }
        }
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        public_object_url(&self.public_base_url, &self.bucket, path)
    }
}

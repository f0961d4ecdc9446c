use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::error::StorageError;
use super::path::{join_path, normalize_path};

/// Page size used when walking a folder tree.
const WALK_PAGE_SIZE: u64 = 1000;

/// Column a listing is sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    #[default]
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Options for a single-level listing.
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub limit: u64,
    pub offset: u64,
    pub sort_column: SortColumn,
    pub sort_order: SortOrder,
    /// Case-insensitive substring filter on the entry name.
    pub search: Option<String>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
            sort_column: SortColumn::Name,
            sort_order: SortOrder::Asc,
            search: None,
        }
    }
}

/// One entry of a single-level listing.
///
/// Folders carry no size; objects always do (a zero-byte object has `Some(0)`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    /// Name relative to the listed folder.
    pub name: String,
    pub size: Option<u64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ObjectEntry {
    pub fn is_folder(&self) -> bool {
        self.size.is_none()
    }
}

/// Path-addressed object storage with folder-like listings.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List the direct children of `prefix`. A missing folder lists as empty.
    async fn list(
        &self,
        prefix: &str,
        options: &ListOptions,
    ) -> Result<Vec<ObjectEntry>, StorageError>;

    /// Store bytes at `path`, replacing any existing object.
    async fn upload(&self, path: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Retrieve all bytes of the object at `path`.
    async fn download(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Remove the objects at `paths`. Missing objects are ignored.
    async fn remove(&self, paths: &[String]) -> Result<(), StorageError>;

    /// Public URL under which the object at `path` is served.
    fn public_url(&self, path: &str) -> String;

    /// Collect the paths of every object below `prefix`, depth first.
    async fn list_recursive(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut pending = vec![normalize_path(prefix)?];
        let mut objects = Vec::new();

        while let Some(folder) = pending.pop() {
            let mut offset = 0;
            loop {
                let options = ListOptions {
                    limit: WALK_PAGE_SIZE,
                    offset,
                    ..Default::default()
                };
                let page = self.list(&folder, &options).await?;
                let count = page.len() as u64;
                for entry in page {
                    let path = join_path(&folder, &entry.name);
                    if entry.is_folder() {
                        pending.push(path);
                    } else {
                        objects.push(path);
                    }
                }
                if count < WALK_PAGE_SIZE {
                    break;
                }
                offset += count;
            }
        }

        Ok(objects)
    }
}

/// Apply search, sort and pagination to a complete single-level listing.
///
/// Backends without native offset support list everything and delegate here.
pub(crate) fn apply_list_options(
    mut entries: Vec<ObjectEntry>,
    options: &ListOptions,
) -> Vec<ObjectEntry> {
    if let Some(term) = options.search.as_deref().map(str::trim)
        && !term.is_empty()
    {
        let term = term.to_lowercase();
        entries.retain(|e| e.name.to_lowercase().contains(&term));
    }

    entries.sort_by(|a, b| {
        let ordering = match options.sort_column {
            SortColumn::Name => a.name.cmp(&b.name),
            SortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
            SortColumn::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
        .then_with(|| a.name.cmp(&b.name));
        match options.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    entries
        .into_iter()
        .skip(usize::try_from(options.offset).unwrap_or(usize::MAX))
        .take(usize::try_from(options.limit).unwrap_or(usize::MAX))
        .collect()
}

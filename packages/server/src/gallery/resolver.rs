use std::collections::HashMap;

use common::storage::{ListOptions, ObjectEntry, ObjectStore, join_path, normalize_path};
use sea_orm::*;
use tracing::instrument;

use super::GalleryError;
use super::classify::classify_entry;
use crate::entity::image;
use crate::models::gallery::{GalleryItem, GalleryItemType, GalleryPage, GalleryQuery};

pub const DEFAULT_PAGE_SIZE: u64 = 24;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Entries listed to compute the page count. Folders with more entries are
/// undercounted.
const COUNT_LIMIT: u64 = 1000;

fn page_count(entries: &[ObjectEntry], page_size: u64) -> u64 {
    let total = entries
        .iter()
        .filter(|e| classify_entry(e).is_some())
        .count() as u64;
    Ord::max(total.div_ceil(page_size), 1)
}

/// List one page of a gallery folder, overlaying image metadata by URL.
#[instrument(skip(store, db, query), fields(path = %query.path))]
pub async fn list_gallery<C: ConnectionTrait>(
    store: &dyn ObjectStore,
    db: &C,
    query: &GalleryQuery,
) -> Result<GalleryPage, GalleryError> {
    let folder = normalize_path(&query.path)?;
    let page = Ord::max(query.page.unwrap_or(1), 1);
    let page_size = query
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let count_options = ListOptions {
        limit: COUNT_LIMIT,
        offset: 0,
        search: search.clone(),
        ..Default::default()
    };

    let Some(offset) = (page - 1).checked_mul(page_size) else {
        let counted = store.list(&folder, &count_options).await?;
        return Ok(GalleryPage {
            items: Vec::new(),
            page,
            total_pages: page_count(&counted, page_size),
        });
    };

    let page_options = ListOptions {
        limit: page_size,
        offset,
        sort_column: query.sort_by.unwrap_or_default(),
        sort_order: query.sort_order.unwrap_or_default(),
        search,
    };

    let (entries, counted) = tokio::try_join!(
        store.list(&folder, &page_options),
        store.list(&folder, &count_options),
    )?;
    let total_pages = page_count(&counted, page_size);

    let mut items: Vec<GalleryItem> = entries
        .into_iter()
        .filter_map(|entry| {
            let kind = classify_entry(&entry)?;
            Some(to_item(store, &folder, entry, kind))
        })
        .collect();

    overlay_metadata(db, &mut items).await?;

    Ok(GalleryPage {
        items,
        page,
        total_pages,
    })
}

fn to_item(
    store: &dyn ObjectStore,
    folder: &str,
    entry: ObjectEntry,
    kind: GalleryItemType,
) -> GalleryItem {
    let path = join_path(folder, &entry.name);
    let url = (kind == GalleryItemType::Image).then(|| store.public_url(&path));
    GalleryItem {
        name: entry.name,
        path,
        item_type: kind,
        url,
        size: entry.size,
        updated_at: entry.updated_at,
        id: None,
        title: None,
        description: None,
        is_primary: false,
        cat_id: None,
        created_at: entry.created_at,
    }
}

async fn overlay_metadata<C: ConnectionTrait>(
    db: &C,
    items: &mut [GalleryItem],
) -> Result<(), DbErr> {
    let urls: Vec<String> = items.iter().filter_map(|i| i.url.clone()).collect();
    if urls.is_empty() {
        return Ok(());
    }

    let rows: HashMap<String, image::Model> = image::Entity::find()
        .filter(image::Column::Url.is_in(urls))
        .all(db)
        .await?
        .into_iter()
        .map(|row| (row.url.clone(), row))
        .collect();

    for item in items.iter_mut() {
        let Some(row) = item.url.as_ref().and_then(|url| rows.get(url)) else {
            continue;
        };
        item.id = Some(row.id);
        item.title = row.title.clone();
        item.description = row.description.clone();
        item.is_primary = row.is_primary;
        item.cat_id = row.cat_id;
        item.created_at = Some(row.created_at);
    }
    Ok(())
}

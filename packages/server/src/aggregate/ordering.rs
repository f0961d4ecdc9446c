use std::cmp::Ordering;

use uuid::Uuid;

use crate::entity::image;

/// `display_order` ascending with unset values last.
fn by_display_order(a: &image::Model, b: &image::Model) -> Ordering {
    match (a.display_order, b.display_order) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort a cat's images by (display_order, is_primary desc, created_at desc, id)
/// and give every image without a `display_order` the next free slot.
///
/// Returns the `(image id, display_order)` pairs that were assigned so the
/// caller can persist them.
pub fn order_cat_images(images: &mut [image::Model]) -> Vec<(Uuid, i32)> {
    images.sort_by(|a, b| {
        by_display_order(a, b)
            .then_with(|| b.is_primary.cmp(&a.is_primary))
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
    assign_missing_orders(images)
}

/// Sort achievement images by (display_order, created_at, id).
pub fn order_achievement_images(images: &mut [image::Model]) {
    images.sort_by(|a, b| {
        by_display_order(a, b)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Unset orders sort last, so filling them in sequence keeps the order stable.
fn assign_missing_orders(images: &mut [image::Model]) -> Vec<(Uuid, i32)> {
    let mut next = next_display_order(images);
    let mut assigned = Vec::new();
    for image in images.iter_mut().filter(|i| i.display_order.is_none()) {
        image.display_order = Some(next);
        assigned.push((image.id, next));
        next += 1;
    }
    assigned
}

/// Next `display_order` after the given images.
pub fn next_display_order(images: &[image::Model]) -> i32 {
    images
        .iter()
        .filter_map(|i| i.display_order)
        .max()
        .map_or(0, |max| max + 1)
}

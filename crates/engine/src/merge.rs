//! Reconciliation of an incoming navigation item update with the stored item.
//!
//! Rules applied by [`merge_navigation_item`]:
//!
//! - optional fields and unknown extra fields take the incoming value when the
//!   key is present, so an explicit `null` clears them; absent keys keep the
//!   stored value
//! - `title` is required, so a `null` title keeps the stored one
//! - the identifier is always the one addressed by the request
//! - `items` is replaced wholesale when the update carries a list (even an
//!   empty one); `null` keeps the stored list
//! - `subCategories` is merged by `id`: stored entries first, then incoming
//!   ones, each overlaying the entry with the same id and appending its
//!   `items` to the entry's list without deduplication

use indexmap::IndexMap;
use navsphere_types::{CategoryPatch, NavigationCategory, NavigationItem, NavigationItemPatch};
use serde_json::{Map, Value};

/// Merge `incoming` into `existing`, producing the item to persist under `id`.
pub fn merge_navigation_item(id: &str, existing: &NavigationItem, incoming: NavigationItemPatch) -> NavigationItem {
    let NavigationItemPatch {
        id: _,
        title,
        icon,
        description,
        enabled,
        items,
        sub_categories,
        extra,
    } = incoming;

    let mut merged_extra = existing.extra.clone();
    overlay_extra(&mut merged_extra, extra);

    NavigationItem {
        id: id.to_string(),
        title: title.unwrap_or_else(|| existing.title.clone()),
        icon: icon.unwrap_or_else(|| existing.icon.clone()),
        description: description.unwrap_or_else(|| existing.description.clone()),
        enabled: enabled.unwrap_or(existing.enabled),
        items: items.unwrap_or_else(|| existing.items.clone()),
        sub_categories: merge_sub_categories(&existing.sub_categories, sub_categories.unwrap_or_default()),
        extra: merged_extra,
    }
}

/// Fold stored and incoming sub-categories into one list keyed by `id`.
///
/// Output order is the order in which each id first appears, so stored
/// categories keep their positions and new ones are appended.
pub fn merge_sub_categories(existing: &[NavigationCategory], incoming: Vec<CategoryPatch>) -> Vec<NavigationCategory> {
    let mut by_id: IndexMap<String, NavigationCategory> = IndexMap::with_capacity(existing.len() + incoming.len());

    let stored = existing.iter().cloned().map(CategoryPatch::from);
    for patch in stored.chain(incoming) {
        let entry = by_id
            .entry(patch.id.clone())
            .or_insert_with(|| NavigationCategory {
                id: patch.id.clone(),
                ..NavigationCategory::default()
            });
        apply_category_patch(entry, patch);
    }

    by_id.into_values().collect()
}

fn apply_category_patch(target: &mut NavigationCategory, patch: CategoryPatch) {
    let CategoryPatch {
        id: _,
        title,
        icon,
        description,
        enabled,
        items,
        extra,
    } = patch;

    if let Some(title) = title {
        target.title = title;
    }
    if let Some(icon) = icon {
        target.icon = icon;
    }
    if let Some(description) = description {
        target.description = description;
    }
    if let Some(enabled) = enabled {
        target.enabled = enabled;
    }
    if let Some(items) = items {
        target.items.extend(items);
    }
    overlay_extra(&mut target.extra, extra);
}

fn overlay_extra(target: &mut Map<String, Value>, incoming: Map<String, Value>) {
    target.extend(incoming);
}

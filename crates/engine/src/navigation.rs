//! Navigation document service.
//!
//! Every operation reads the full `navigation.json`, changes it in memory and
//! commits the full document back. There is no locking; the last commit wins
//! unless the store itself rejects a stale revision.

use std::sync::Arc;

use chrono::Utc;
use navsphere_types::{
    FieldViolation, ItemFilter, NAVIGATION_CONTENT_PATH, NavigationCategory, NavigationData, NavigationItem,
    NavigationItemPatch, NavigationSubItem,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ContentError;
use crate::merge::merge_navigation_item;
use crate::store::ContentStore;

/// A category link together with its position in the category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexedItem {
    pub index: usize,
    #[serde(flatten)]
    pub item: NavigationSubItem,
}

#[derive(Debug, Clone)]
pub struct NavigationService {
    store: Arc<dyn ContentStore>,
}

impl NavigationService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    async fn load(&self) -> Result<NavigationData, ContentError> {
        let Some(content) = self.store.read(NAVIGATION_CONTENT_PATH).await? else {
            debug!("navigation document missing; starting empty");
            return Ok(NavigationData::default());
        };
        serde_json::from_str(&content).map_err(|source| ContentError::Serialization {
            path: NAVIGATION_CONTENT_PATH.to_string(),
            source,
        })
    }

    async fn save(&self, data: &NavigationData, message: &str, token: &str) -> Result<(), ContentError> {
        let content = serde_json::to_string_pretty(data).map_err(|source| ContentError::Serialization {
            path: NAVIGATION_CONTENT_PATH.to_string(),
            source,
        })?;
        self.store.commit(NAVIGATION_CONTENT_PATH, &content, message, token).await?;
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<NavigationItem>, ContentError> {
        Ok(self.load().await?.navigation_items)
    }

    pub async fn get(&self, id: &str) -> Result<NavigationItem, ContentError> {
        self.load()
            .await?
            .find(id)
            .cloned()
            .ok_or_else(|| ContentError::NavigationNotFound(id.to_string()))
    }

    /// Append a new navigation item. An empty id is replaced with a
    /// timestamp-based one that no stored item uses.
    pub async fn create(&self, mut item: NavigationItem, token: &str) -> Result<NavigationItem, ContentError> {
        if item.title.trim().is_empty() {
            return Err(ContentError::Validation(vec![FieldViolation {
                field: "title".into(),
                message: "title must not be empty".into(),
            }]));
        }
        let mut data = self.load().await?;
        if item.id.trim().is_empty() {
            item.id = generate_id(|candidate| data.find(candidate).is_some());
        } else if data.find(&item.id).is_some() {
            return Err(ContentError::Conflict(item.id));
        }
        data.navigation_items.push(item.clone());
        self.save(&data, "Add navigation item", token).await?;
        info!(id = %item.id, "navigation item added");
        Ok(item)
    }

    /// Merge `patch` into the stored item and persist the result.
    pub async fn update(&self, id: &str, patch: NavigationItemPatch, token: &str) -> Result<NavigationItem, ContentError> {
        let mut data = self.load().await?;
        let existing = data
            .find_mut(id)
            .ok_or_else(|| ContentError::NavigationNotFound(id.to_string()))?;

        let merged = merge_navigation_item(id, existing, patch);
        *existing = merged.clone();

        self.save(&data, "Update navigation item", token).await?;
        info!(id, "navigation item updated");
        Ok(merged)
    }

    /// Remove the item with `id`. Removing an unknown id still commits.
    pub async fn delete(&self, id: &str, token: &str) -> Result<(), ContentError> {
        let mut data = self.load().await?;
        data.navigation_items.retain(|item| item.id != id);
        self.save(&data, "Delete navigation item", token).await?;
        info!(id, "navigation item deleted");
        Ok(())
    }

    pub async fn category(&self, id: &str, category_id: &str) -> Result<NavigationCategory, ContentError> {
        let item = self.get(id).await?;
        item.category(category_id)
            .cloned()
            .ok_or_else(|| category_not_found(id, category_id))
    }

    /// Links of a category narrowed by a search query and enabled filter.
    pub async fn list_category_items(
        &self,
        id: &str,
        category_id: &str,
        query: Option<&str>,
        filter: ItemFilter,
    ) -> Result<Vec<IndexedItem>, ContentError> {
        let category = self.category(id, category_id).await?;
        let query = query.unwrap_or_default();
        Ok(category
            .items
            .into_iter()
            .enumerate()
            .filter(|(_, item)| filter.accepts(item) && item.matches(query))
            .map(|(index, item)| IndexedItem { index, item })
            .collect())
    }

    pub async fn add_category_item(
        &self,
        id: &str,
        category_id: &str,
        mut item: NavigationSubItem,
        token: &str,
    ) -> Result<NavigationCategory, ContentError> {
        self.modify_category(id, category_id, "Add category item", token, |items| {
            if item.id.trim().is_empty() {
                item.id = generate_id(|candidate| items.iter().any(|existing| existing.id == candidate));
            }
            items.push(item);
            Ok(())
        })
        .await
    }

    pub async fn update_category_item(
        &self,
        id: &str,
        category_id: &str,
        index: usize,
        item: NavigationSubItem,
        token: &str,
    ) -> Result<NavigationCategory, ContentError> {
        self.modify_category(id, category_id, "Update category item", token, |items| {
            let len = items.len();
            let slot = items.get_mut(index).ok_or(ContentError::InvalidIndex { index, len })?;
            *slot = item;
            Ok(())
        })
        .await
    }

    pub async fn delete_category_item(
        &self,
        id: &str,
        category_id: &str,
        index: usize,
        token: &str,
    ) -> Result<NavigationCategory, ContentError> {
        self.modify_category(id, category_id, "Delete category item", token, |items| {
            check_index(index, items.len())?;
            items.remove(index);
            Ok(())
        })
        .await
    }

    /// Move the link at `from` so that it ends up at position `to`.
    pub async fn reorder_category_items(
        &self,
        id: &str,
        category_id: &str,
        from: usize,
        to: usize,
        token: &str,
    ) -> Result<NavigationCategory, ContentError> {
        self.modify_category(id, category_id, "Reorder category items", token, |items| {
            check_index(from, items.len())?;
            check_index(to, items.len())?;
            let moved = items.remove(from);
            items.insert(to, moved);
            Ok(())
        })
        .await
    }

    /// Apply `change` to one category's link list and commit. The list is
    /// replaced directly rather than going through the concatenating merge.
    async fn modify_category<F>(
        &self,
        id: &str,
        category_id: &str,
        message: &str,
        token: &str,
        change: F,
    ) -> Result<NavigationCategory, ContentError>
    where
        F: FnOnce(&mut Vec<NavigationSubItem>) -> Result<(), ContentError>,
    {
        let mut data = self.load().await?;
        let item = data
            .find_mut(id)
            .ok_or_else(|| ContentError::NavigationNotFound(id.to_string()))?;
        let category = item
            .category_mut(category_id)
            .ok_or_else(|| category_not_found(id, category_id))?;

        change(&mut category.items)?;
        let updated = category.clone();

        self.save(&data, message, token).await?;
        info!(id, category_id, commit_message = message, "category items changed");
        Ok(updated)
    }
}

fn check_index(index: usize, len: usize) -> Result<(), ContentError> {
    if index < len { Ok(()) } else { Err(ContentError::InvalidIndex { index, len }) }
}

fn category_not_found(id: &str, category_id: &str) -> ContentError {
    ContentError::CategoryNotFound {
        navigation_id: id.to_string(),
        category_id: category_id.to_string(),
    }
}

/// Millisecond timestamp id, suffixed with `-N` while `taken` rejects it.
fn generate_id(taken: impl Fn(&str) -> bool) -> String {
    let base = Utc::now().timestamp_millis().to_string();
    let mut candidate = base.clone();
    let mut suffix = 0;
    while taken(&candidate) {
        suffix += 1;
        candidate = format!("{base}-{suffix}");
    }
    candidate
}

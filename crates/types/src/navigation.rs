//! Navigation tree documents.
//!
//! A navigation item owns a flat list of links (`items`) and a list of
//! sub-categories, each of which owns its own links. Fields the service does
//! not know about are kept in `extra` so that a read/patch/write cycle never
//! drops data written by other tools.

use std::{error::Error, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Root of `navsphere/content/navigation.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationData {
    #[serde(default)]
    pub navigation_items: Vec<NavigationItem>,
}

impl NavigationData {
    pub fn find(&self, id: &str) -> Option<&NavigationItem> {
        self.navigation_items.iter().find(|item| item.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut NavigationItem> {
        self.navigation_items.iter_mut().find(|item| item.id == id)
    }
}

/// Top-level navigation entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationItem {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub items: Vec<NavigationSubItem>,
    #[serde(default)]
    pub sub_categories: Vec<NavigationCategory>,
    /// Unrecognized fields, carried through unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NavigationItem {
    pub fn category(&self, category_id: &str) -> Option<&NavigationCategory> {
        self.sub_categories.iter().find(|category| category.id == category_id)
    }

    pub fn category_mut(&mut self, category_id: &str) -> Option<&mut NavigationCategory> {
        self.sub_categories.iter_mut().find(|category| category.id == category_id)
    }
}

/// Sub-category nested under a [`NavigationItem`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationCategory {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub items: Vec<NavigationSubItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single link entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationSubItem {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_enabled() -> bool {
    true
}

impl NavigationSubItem {
    /// Case-insensitive substring match against title, href and description.
    /// An empty query matches everything; whitespace is matched literally.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&needle)
            || self.href.to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .is_some_and(|description| description.to_lowercase().contains(&needle))
    }
}

/// Incoming body of a navigation item update.
///
/// Absent fields leave the stored value untouched. For the optional fields
/// the outer `Option` records presence, so an explicit `null` (`Some(None)`)
/// clears the stored value. `title` and the collections cannot be cleared:
/// `null` there behaves like an absent field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub icon: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub enabled: Option<Option<bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<NavigationSubItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_categories: Option<Vec<CategoryPatch>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Incoming sub-category inside a [`NavigationItemPatch`]. Only `id` is
/// required; it is the identity used to pair the entry with a stored one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub icon: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub enabled: Option<Option<bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<NavigationSubItem>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<NavigationCategory> for CategoryPatch {
    fn from(category: NavigationCategory) -> Self {
        Self {
            id: category.id,
            title: Some(category.title),
            icon: category.icon.map(Some),
            description: category.description.map(Some),
            enabled: category.enabled.map(Some),
            items: Some(category.items),
            extra: category.extra,
        }
    }
}

/// Marks a field as present, keeping an explicit `null` as `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Enabled-state filter used when listing a category's links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemFilter {
    #[default]
    All,
    Enabled,
    Disabled,
}

impl ItemFilter {
    pub fn accepts(self, item: &NavigationSubItem) -> bool {
        match self {
            Self::All => true,
            Self::Enabled => item.enabled,
            Self::Disabled => !item.enabled,
        }
    }
}

impl FromStr for ItemFilter {
    type Err = ParseItemFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "enabled" => Ok(Self::Enabled),
            "disabled" => Ok(Self::Disabled),
            _ => Err(ParseItemFilterError),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseItemFilterError;

impl fmt::Display for ParseItemFilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid item filter; expected 'all', 'enabled' or 'disabled'")
    }
}

impl Error for ParseItemFilterError {}

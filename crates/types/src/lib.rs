//! Shared data model for the NavSphere admin service.
//!
//! Every type here mirrors the JSON documents committed to the content
//! repository, so field names follow the persisted camelCase spelling.

pub mod navigation;
pub mod site;

pub use navigation::{
    CategoryPatch, ItemFilter, NavigationCategory, NavigationData, NavigationItem, NavigationItemPatch, NavigationSubItem,
    ParseItemFilterError,
};
pub use site::{AppearanceSettings, BasicSettings, FieldViolation, LinkTarget, NavigationSettings, SiteConfig, Theme};

/// Repository path of the navigation document.
pub const NAVIGATION_CONTENT_PATH: &str = "navsphere/content/navigation.json";

/// Repository path of the site configuration document.
pub const SITE_CONTENT_PATH: &str = "navsphere/content/site.json";

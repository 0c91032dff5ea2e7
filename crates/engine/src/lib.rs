//! # NavSphere Engine
//!
//! Content services for the NavSphere admin backend. Navigation items and the
//! site configuration are JSON documents in a content repository; every
//! change reads the whole document, edits it in memory and commits it back.
//!
//! ## Architecture
//!
//! - **`store`**: the [`ContentStore`] seam plus GitHub and in-memory stores
//! - **`merge`**: reconciliation of navigation item updates with stored items
//! - **`navigation`**: [`NavigationService`] for items, categories and links
//! - **`site`**: [`SiteConfigService`] for the site configuration form
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use navsphere_engine::{MemoryStore, NavigationService};
//!
//! let navigation = NavigationService::new(Arc::new(MemoryStore::new()));
//! let items = navigation.list().await?;
//! ```

mod error;
pub mod merge;
pub mod navigation;
pub mod site;
pub mod store;

pub use error::ContentError;
pub use merge::{merge_navigation_item, merge_sub_categories};
pub use navigation::{IndexedItem, NavigationService};
pub use site::SiteConfigService;
pub use store::{CommitRecord, ContentStore, GitHubStore, MemoryStore, StoreError};

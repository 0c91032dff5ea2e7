use navsphere_types::FieldViolation;
use thiserror::Error;

use crate::store::StoreError;

/// Errors returned by the content services.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("navigation item '{0}' not found")]
    NavigationNotFound(String),
    #[error("category '{category_id}' not found in navigation item '{navigation_id}'")]
    CategoryNotFound { navigation_id: String, category_id: String },
    #[error("navigation item '{0}' already exists")]
    Conflict(String),
    #[error("item index {index} is out of range for a category with {len} items")]
    InvalidIndex { index: usize, len: usize },
    #[error("validation failed: {}", summarize(.0))]
    Validation(Vec<FieldViolation>),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("malformed content document '{path}': {source}")]
    Serialization {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ContentError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NavigationNotFound(_) | Self::CategoryNotFound { .. })
    }
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

//! Site configuration document (`navsphere/content/site.json`).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Absolute http(s) URL or a root-relative path.
static ASSET_LOCATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(https?://|/)\S+$").expect("asset location pattern"));

const MIN_TITLE_CHARS: usize = 2;
const MIN_DESCRIPTION_CHARS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    #[serde(default)]
    pub basic: BasicSettings,
    #[serde(default)]
    pub appearance: AppearanceSettings,
    #[serde(default)]
    pub navigation: NavigationSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicSettings {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppearanceSettings {
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub favicon: String,
    #[serde(default)]
    pub theme: Theme,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationSettings {
    #[serde(default)]
    pub link_target: LinkTarget,
}

/// Browsing context used for outbound navigation links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkTarget {
    #[default]
    #[serde(rename = "_blank")]
    NewTab,
    #[serde(rename = "_self")]
    SameTab,
}

/// A single failed validation rule, addressed by dotted field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{field}: {message}")]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl SiteConfig {
    /// Check the form rules and report every violation found.
    ///
    /// Enumerated fields (`theme`, `linkTarget`) are already closed by their
    /// types and cannot fail here.
    pub fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        let mut violations = Vec::new();

        if self.basic.title.chars().count() < MIN_TITLE_CHARS {
            violations.push(FieldViolation::new(
                "basic.title",
                format!("title must be at least {MIN_TITLE_CHARS} characters"),
            ));
        }
        if self.basic.description.chars().count() < MIN_DESCRIPTION_CHARS {
            violations.push(FieldViolation::new(
                "basic.description",
                format!("description must be at least {MIN_DESCRIPTION_CHARS} characters"),
            ));
        }
        for (field, value) in [
            ("appearance.logo", &self.appearance.logo),
            ("appearance.favicon", &self.appearance.favicon),
        ] {
            if !ASSET_LOCATION.is_match(value) {
                violations.push(FieldViolation::new(field, "must be an http(s) URL or a path starting with '/'"));
            }
        }

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }
}

//! Site configuration service.

use std::sync::Arc;

use navsphere_types::{SITE_CONTENT_PATH, SiteConfig};
use tracing::info;

use crate::error::ContentError;
use crate::store::ContentStore;

#[derive(Debug, Clone)]
pub struct SiteConfigService {
    store: Arc<dyn ContentStore>,
}

impl SiteConfigService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Stored configuration, or the defaults when none was saved yet.
    pub async fn get(&self) -> Result<SiteConfig, ContentError> {
        let Some(content) = self.store.read(SITE_CONTENT_PATH).await? else {
            return Ok(SiteConfig::default());
        };
        serde_json::from_str(&content).map_err(|source| ContentError::Serialization {
            path: SITE_CONTENT_PATH.to_string(),
            source,
        })
    }

    pub async fn update(&self, config: SiteConfig, token: &str) -> Result<SiteConfig, ContentError> {
        config.validate().map_err(ContentError::Validation)?;

        let content = serde_json::to_string_pretty(&config).map_err(|source| ContentError::Serialization {
            path: SITE_CONTENT_PATH.to_string(),
            source,
        })?;
        self.store.commit(SITE_CONTENT_PATH, &content, "Update site config", token).await?;
        info!(title = %config.basic.title, "site config updated");
        Ok(config)
    }
}

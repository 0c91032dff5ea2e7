use std::sync::Arc;

use navsphere_engine::{ContentStore, NavigationService, SiteConfigService};

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub navigation: NavigationService,
    pub site: SiteConfigService,
}

impl AppState {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            navigation: NavigationService::new(Arc::clone(&store)),
            site: SiteConfigService::new(store),
        }
    }
}

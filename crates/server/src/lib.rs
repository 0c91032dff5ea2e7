//! HTTP surface of the NavSphere admin backend.
//!
//! The router exposes the navigation tree and the site configuration as JSON
//! resources. Reads are public; changes require a bearer token, which is
//! passed through to the content store as the committing identity.

pub mod auth;
pub mod config;
mod error;
mod extract;
mod http;
mod routes;
mod state;

use std::sync::Arc;

use navsphere_api::GitHubClient;
use navsphere_engine::{ContentStore, GitHubStore};

pub use config::{AdminConfig, ConfigError, default_config_path, load_config, load_config_from_path};
pub use error::ApiError;
pub use http::{AdminServer, RunningAdminServer, resolve_bind_address};
pub use routes::router;
pub use state::AppState;

/// Build the GitHub-backed content store described by `config`.
pub fn github_store(config: &AdminConfig) -> Result<Arc<dyn ContentStore>, ConfigError> {
    config.validate_github()?;
    let client = GitHubClient::new(config.github.clone(), config::github_read_token())
        .map_err(|error| ConfigError::Invalid(error.to_string()))?;
    Ok(Arc::new(GitHubStore::new(client)))
}

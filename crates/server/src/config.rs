//! Admin server configuration.
//!
//! Settings come from a JSON file (`~/.config/navsphere/config.json` unless
//! `NAVSPHERE_CONFIG_PATH` points elsewhere) and are then overridden by
//! environment variables. The GitHub read token is only ever taken from the
//! environment and is never written to disk.

use std::fs;
use std::path::{Path, PathBuf};

use dirs_next::config_dir;
use navsphere_api::RepositorySettings;
use navsphere_util::{expand_tilde, non_empty_env};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Environment variable allowing callers to override the config file path.
pub const CONFIG_PATH_ENV: &str = "NAVSPHERE_CONFIG_PATH";
pub const BIND_ENV: &str = "NAVSPHERE_BIND";
pub const API_BASE_ENV: &str = "GITHUB_API_BASE";
pub const OWNER_ENV: &str = "GITHUB_OWNER";
pub const REPO_ENV: &str = "GITHUB_REPO";
pub const BRANCH_ENV: &str = "GITHUB_BRANCH";
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8787";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AdminConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default)]
    pub github: RepositorySettings,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            github: RepositorySettings::default(),
        }
    }
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

impl AdminConfig {
    /// Apply `NAVSPHERE_BIND` and `GITHUB_*` overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Some(bind) = non_empty_env(BIND_ENV) {
            self.bind_address = bind;
        }
        if let Some(api_base) = non_empty_env(API_BASE_ENV) {
            self.github.api_base = api_base;
        }
        if let Some(owner) = non_empty_env(OWNER_ENV) {
            self.github.owner = owner;
        }
        if let Some(repo) = non_empty_env(REPO_ENV) {
            self.github.repo = repo;
        }
        if let Some(branch) = non_empty_env(BRANCH_ENV) {
            self.github.branch = branch;
        }
    }

    /// Check that the repository coordinates are usable.
    pub fn validate_github(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();
        if self.github.owner.trim().is_empty() {
            missing.push(OWNER_ENV);
        }
        if self.github.repo.trim().is_empty() {
            missing.push(REPO_ENV);
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(format!(
                "repository is not configured; set {} or the github section of the config file",
                missing.join(" and ")
            )))
        }
    }
}

/// Token used for unauthenticated reads of the content repository.
pub fn github_read_token() -> Option<String> {
    non_empty_env(TOKEN_ENV)
}

/// Returns the default path for the admin configuration file.
pub fn default_config_path() -> PathBuf {
    if let Some(path) = non_empty_env(CONFIG_PATH_ENV) {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("navsphere")
        .join("config.json")
}

/// Loads configuration from the default path and applies env overrides.
pub fn load_config() -> Result<AdminConfig, ConfigError> {
    let path = default_config_path();
    load_config_from_path(&path)
}

/// Loads configuration from a specific path and applies env overrides. A
/// missing file yields the defaults.
pub fn load_config_from_path(path: &Path) -> Result<AdminConfig, ConfigError> {
    let mut config = match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found; using defaults");
            AdminConfig::default()
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    config.apply_env_overrides();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const OVERRIDE_VARS: [&str; 5] = [BIND_ENV, API_BASE_ENV, OWNER_ENV, REPO_ENV, BRANCH_ENV];

    fn without_overrides<F: FnOnce()>(f: F) {
        let unset: Vec<(&str, Option<&str>)> = OVERRIDE_VARS.iter().map(|name| (*name, None)).collect();
        temp_env::with_vars(unset, f);
    }

    #[test]
    fn default_path_honors_environment_override() {
        let override_path = "~/custom/navsphere/config.json";
        temp_env::with_var(CONFIG_PATH_ENV, Some(override_path), || {
            assert_eq!(default_config_path(), expand_tilde(override_path));
        });
    }

    #[test]
    fn missing_file_yields_defaults() {
        without_overrides(|| {
            let dir = tempdir().unwrap();
            let config = load_config_from_path(&dir.path().join("config.json")).unwrap();
            assert_eq!(config, AdminConfig::default());
            assert_eq!(config.bind_address, "127.0.0.1:8787");
            assert_eq!(config.github.api_base, "https://api.github.com");
            assert_eq!(config.github.branch, "main");
        });
    }

    #[test]
    fn file_values_are_loaded() {
        without_overrides(|| {
            let dir = tempdir().unwrap();
            let path = dir.path().join("config.json");
            fs::write(
                &path,
                r#"{ "bindAddress": "0.0.0.0:9000", "github": { "owner": "octo", "repo": "links", "branch": "content" } }"#,
            )
            .unwrap();

            let config = load_config_from_path(&path).unwrap();
            assert_eq!(config.bind_address, "0.0.0.0:9000");
            assert_eq!(config.github.owner, "octo");
            assert_eq!(config.github.branch, "content");
            assert_eq!(config.github.api_base, "https://api.github.com");
            assert!(config.validate_github().is_ok());
        });
    }

    #[test]
    fn environment_overrides_file_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "github": { "owner": "octo", "repo": "links" } }"#).unwrap();

        temp_env::with_vars(
            [
                (OWNER_ENV, Some("hubot")),
                (BRANCH_ENV, Some("staging")),
                (BIND_ENV, None),
                (API_BASE_ENV, None),
                (REPO_ENV, None),
            ],
            || {
                let config = load_config_from_path(&path).unwrap();
                assert_eq!(config.github.owner, "hubot");
                assert_eq!(config.github.repo, "links");
                assert_eq!(config.github.branch, "staging");
            },
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "bindAddres": "typo" }"#).unwrap();
        assert!(matches!(load_config_from_path(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn repository_coordinates_are_required() {
        let error = AdminConfig::default().validate_github().unwrap_err();
        assert!(error.to_string().contains(OWNER_ENV));
        assert!(error.to_string().contains(REPO_ENV));
    }
}

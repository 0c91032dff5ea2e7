//! GitHub repository contents client.
//!
//! NavSphere keeps its data as JSON files inside a GitHub repository. This
//! crate wraps the small slice of the REST API needed for that:
//!
//! - reading a file (and its blob sha) through `GET /repos/{owner}/{repo}/contents/{path}`
//! - committing a new revision through `PUT` on the same endpoint
//!
//! The primary entry point is [`GitHubClient`]. Build one from a
//! [`RepositorySettings`] and an optional read token; commits always take the
//! token of the user performing the change.
//!
//! # Example
//!
//! ```ignore
//! use navsphere_api::{GitHubClient, RepositorySettings};
//!
//! async fn show() -> Result<(), navsphere_api::GitHubError> {
//!     let settings = RepositorySettings::new("octo", "links");
//!     let client = GitHubClient::new(settings, None)?;
//!     if let Some(file) = client.get_file("navsphere/content/navigation.json", None).await? {
//!         println!("{} ({})", file.content, file.sha);
//!     }
//!     Ok(())
//! }
//! ```

use std::env;
use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STANDARD};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url, header};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Public GitHub REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
/// Branch used when none is configured.
pub const DEFAULT_BRANCH: &str = "main";

const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "x-github-api-version";
const API_VERSION: &str = "2022-11-28";
/// Hostnames allowed for local development regardless of scheme.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

/// Characters left unescaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Errors surfaced by [`GitHubClient`].
#[derive(Debug, Error)]
pub enum GitHubError {
    /// The client settings cannot be used to talk to GitHub.
    #[error("invalid GitHub configuration: {0}")]
    Config(String),
    /// Network or protocol failure before a response was received.
    #[error("GitHub request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// GitHub answered with a non-success status.
    #[error("GitHub responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// The response body did not have the expected shape.
    #[error("could not decode GitHub response: {0}")]
    Decode(String),
}

/// Repository coordinates used to address content files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySettings {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub repo: String,
    #[serde(default = "default_branch")]
    pub branch: String,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            owner: String::new(),
            repo: String::new(),
            branch: default_branch(),
        }
    }
}

impl RepositorySettings {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            ..Self::default()
        }
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

/// A file read from the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// Decoded UTF-8 file content.
    pub content: String,
    /// Blob sha, required by GitHub when overwriting the file.
    pub sha: String,
}

/// Identifiers returned after a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub content_sha: String,
    pub commit_sha: String,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: String,
    sha: String,
}

#[derive(Debug, Serialize)]
struct PutContentsRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PutContentsResponse {
    content: ShaRef,
    commit: ShaRef,
}

#[derive(Debug, Deserialize)]
struct ShaRef {
    sha: String,
}

/// Thin wrapper around a configured `reqwest::Client` for the contents API.
///
/// Default headers select the GitHub JSON media type and API version. Each
/// request may carry its own token; reads fall back to the token supplied at
/// construction time.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    pub base_url: String,
    pub http: Client,
    pub user_agent: String,
    settings: RepositorySettings,
    read_token: Option<String>,
}

impl GitHubClient {
    /// Construct a client for the given repository.
    ///
    /// The base URL must use https unless it points at `localhost` or
    /// `127.0.0.1`. Owner and repository must be non-empty.
    pub fn new(settings: RepositorySettings, read_token: Option<String>) -> Result<Self, GitHubError> {
        validate_base_url(&settings.api_base)?;
        if settings.owner.trim().is_empty() || settings.repo.trim().is_empty() {
            return Err(GitHubError::Config("repository owner and name are required".into()));
        }
        if settings.branch.trim().is_empty() {
            return Err(GitHubError::Config("branch must not be empty".into()));
        }

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT_GITHUB_JSON));
        default_headers.insert(API_VERSION_HEADER, header::HeaderValue::from_static(API_VERSION));

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url: settings.api_base.trim_end_matches('/').to_string(),
            http,
            user_agent: format!("navsphere-admin/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
            settings,
            read_token,
        })
    }

    pub fn settings(&self) -> &RepositorySettings {
        &self.settings
    }

    /// Absolute contents endpoint for a repository-relative file path.
    pub fn contents_url(&self, path: &str) -> String {
        let encoded_path = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.base_url,
            utf8_percent_encode(&self.settings.owner, PATH_SEGMENT),
            utf8_percent_encode(&self.settings.repo, PATH_SEGMENT),
            encoded_path
        )
    }

    /// Build a request against the contents endpoint, authorized with
    /// `token` when given.
    pub fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = self.contents_url(path);
        debug!(%method, %url, "building request");

        let builder = self
            .http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Read a file from the configured branch. A missing file yields `None`.
    pub async fn get_file(&self, path: &str, token: Option<&str>) -> Result<Option<RemoteFile>, GitHubError> {
        let token = token.or(self.read_token.as_deref());
        let response = self
            .request(Method::GET, path, token)
            .query(&[("ref", self.settings.branch.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(path, "content file not found");
            return Ok(None);
        }
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GitHubError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let contents: ContentsResponse =
            serde_json::from_str(&body).map_err(|error| GitHubError::Decode(format!("contents payload: {error}")))?;
        let content = decode_content(&contents)?;
        Ok(Some(RemoteFile {
            content,
            sha: contents.sha,
        }))
    }

    /// Commit `content` as the new revision of `path`.
    ///
    /// `sha` must be the blob sha of the current revision when the file
    /// already exists, and `None` when creating it.
    pub async fn put_file(
        &self,
        path: &str,
        content: &str,
        message: &str,
        sha: Option<&str>,
        token: &str,
    ) -> Result<CommitOutcome, GitHubError> {
        let payload = PutContentsRequest {
            message,
            content: BASE64_STANDARD.encode(content.as_bytes()),
            branch: &self.settings.branch,
            sha,
        };
        let response = self.request(Method::PUT, path, Some(token)).json(&payload).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GitHubError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let committed: PutContentsResponse =
            serde_json::from_str(&body).map_err(|error| GitHubError::Decode(format!("commit payload: {error}")))?;
        info!(path, commit = %committed.commit.sha, "committed content file");
        Ok(CommitOutcome {
            content_sha: committed.content.sha,
            commit_sha: committed.commit.sha,
        })
    }
}

/// Decode the base64 body of a contents response. GitHub wraps the payload
/// at 60 columns, so whitespace is stripped first.
fn decode_content(contents: &ContentsResponse) -> Result<String, GitHubError> {
    if contents.encoding != "base64" {
        return Err(GitHubError::Decode(format!(
            "unsupported content encoding '{}'",
            contents.encoding
        )));
    }
    let compact: String = contents.content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = BASE64_STANDARD
        .decode(compact.as_bytes())
        .map_err(|error| GitHubError::Decode(format!("base64 content: {error}")))?;
    String::from_utf8(bytes).map_err(|error| GitHubError::Decode(format!("content is not UTF-8: {error}")))
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS
fn validate_base_url(base: &str) -> Result<(), GitHubError> {
    let parsed_base_url =
        Url::parse(base).map_err(|error| GitHubError::Config(format!("invalid API base URL '{base}': {error}")))?;

    let host_name = parsed_base_url
        .host_str()
        .ok_or_else(|| GitHubError::Config("API base URL must include a host".into()))?;

    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(());
    }

    if parsed_base_url.scheme() != "https" {
        return Err(GitHubError::Config(format!(
            "API base URL must use https for non-localhost hosts; got '{}://'",
            parsed_base_url.scheme()
        )));
    }
    Ok(())
}

//! Content stores: where the JSON documents live.
//!
//! Modules above this layer only ever read a whole document and commit a
//! whole document. [`GitHubStore`] does that against a repository;
//! [`MemoryStore`] keeps documents in process.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Mutex;

use navsphere_api::{GitHubClient, GitHubError};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    GitHub(#[from] GitHubError),
}

/// Whole-document access to the content repository.
#[async_trait::async_trait]
pub trait ContentStore: Debug + Send + Sync {
    /// Read the document at `path`; `None` when it does not exist yet.
    async fn read(&self, path: &str) -> Result<Option<String>, StoreError>;

    /// Replace the document at `path`, attributed to the holder of `token`.
    async fn commit(&self, path: &str, content: &str, message: &str, token: &str) -> Result<(), StoreError>;
}

/// Store backed by the GitHub contents API.
#[derive(Debug, Clone)]
pub struct GitHubStore {
    client: GitHubClient,
}

impl GitHubStore {
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ContentStore for GitHubStore {
    async fn read(&self, path: &str) -> Result<Option<String>, StoreError> {
        let file = self.client.get_file(path, None).await?;
        Ok(file.map(|file| file.content))
    }

    async fn commit(&self, path: &str, content: &str, message: &str, token: &str) -> Result<(), StoreError> {
        // The contents API needs the blob sha of the revision being replaced.
        let current = self.client.get_file(path, Some(token)).await?;
        let sha = current.as_ref().map(|file| file.sha.as_str());
        debug!(path, has_previous = sha.is_some(), "committing content file");
        let outcome = self.client.put_file(path, content, message, sha, token).await?;
        info!(path, commit_message = message, commit = %outcome.commit_sha, "content committed");
        Ok(())
    }
}

/// A commit recorded by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub path: String,
    pub message: String,
}

/// In-process store for local runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, String>>,
    commits: Mutex<Vec<CommitRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document without recording a commit.
    pub fn with_document(self, path: &str, content: impl Into<String>) -> Self {
        self.documents
            .lock()
            .expect("memory store lock poisoned")
            .insert(path.to_string(), content.into());
        self
    }

    pub fn document(&self, path: &str) -> Option<String> {
        self.documents.lock().expect("memory store lock poisoned").get(path).cloned()
    }

    pub fn commits(&self) -> Vec<CommitRecord> {
        self.commits.lock().expect("memory store lock poisoned").clone()
    }
}

#[async_trait::async_trait]
impl ContentStore for MemoryStore {
    async fn read(&self, path: &str) -> Result<Option<String>, StoreError> {
        Ok(self.document(path))
    }

    async fn commit(&self, path: &str, content: &str, message: &str, _token: &str) -> Result<(), StoreError> {
        self.documents
            .lock()
            .expect("memory store lock poisoned")
            .insert(path.to_string(), content.to_string());
        self.commits.lock().expect("memory store lock poisoned").push(CommitRecord {
            path: path.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }
}

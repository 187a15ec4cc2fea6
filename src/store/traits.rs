use super::models::RemoteEntry;
use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// Operations the facade needs from a remote file store.
///
/// Paths are absolute and relative to the store's base url.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Lists a directory and its direct children.
    async fn list(&self, path: &str) -> Result<Vec<RemoteEntry>>;
    /// `Ok(false)` when the server reports the resource missing.
    async fn exists(&self, path: &str) -> Result<bool>;
    /// Creates a single directory; the parent must exist.
    async fn create_directory(&self, path: &str) -> Result<()>;
    async fn delete(&self, path: &str) -> Result<()>;
    async fn put(&self, path: &str, content: Bytes) -> Result<()>;
    async fn get(&self, path: &str) -> Result<Bytes>;
}

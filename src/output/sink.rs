//! Resource sink trait and the filesystem mirror
//!
//! The sink receives every successfully fetched body together with the
//! classifier's resource kind and storage-relative path. [`DiskSink`]
//! reproduces the original site layout under one root directory, with
//! stylesheets, scripts, and images grouped into their own
//! subdirectories by the classifier's paths.

use crate::resources::ResourceKind;
use async_trait::async_trait;
use std::path::PathBuf;
use url::Url;

/// Receives fetched resource bodies from a crawl session
#[async_trait]
pub trait ResourceSink: Send {
    /// Stores one fetched body under the classifier's relative path
    async fn store(
        &mut self,
        url: &Url,
        kind: ResourceKind,
        rel_path: &str,
        body: &[u8],
    ) -> std::io::Result<()>;
}

/// Writes fetched resources into a directory tree
pub struct DiskSink {
    root: PathBuf,
}

impl DiskSink {
    /// Creates a sink rooted at the given directory, creating it and the
    /// kind subdirectories if needed
    pub async fn new(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        for sub in ["css", "js", "images"] {
            tokio::fs::create_dir_all(root.join(sub)).await?;
        }
        Ok(Self { root })
    }
}

#[async_trait]
impl ResourceSink for DiskSink {
    async fn store(
        &mut self,
        url: &Url,
        _kind: ResourceKind,
        rel_path: &str,
        body: &[u8],
    ) -> std::io::Result<()> {
        let path = self.root.join(rel_path);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, body).await?;
        tracing::debug!("stored {} at {}", url, path.display());
        Ok(())
    }
}

//! Content Resolver Implementation for Desktop

use async_trait::async_trait;
use bridge_traits::{
    content::ContentResolver,
    error::{BridgeError, Result},
};
use bytes::Bytes;
use std::path::PathBuf;
use tracing::debug;

/// Resolves `file://` URIs and plain filesystem paths.
pub struct FileContentResolver;

impl FileContentResolver {
    pub fn new() -> Self {
        Self
    }

    fn to_path(uri: &str) -> Result<PathBuf> {
        if let Some(stripped) = uri.strip_prefix("file://") {
            Ok(PathBuf::from(stripped))
        } else if uri.contains("://") {
            Err(BridgeError::NotAvailable(format!(
                "Unsupported URI scheme: {}",
                uri
            )))
        } else {
            Ok(PathBuf::from(uri))
        }
    }
}

impl Default for FileContentResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentResolver for FileContentResolver {
    async fn open_local(&self, uri: &str) -> Result<Bytes> {
        let path = Self::to_path(uri)?;

        if !tokio::fs::try_exists(&path).await.map_err(BridgeError::Io)? {
            return Err(BridgeError::NotFound(uri.to_string()));
        }

        let data = tokio::fs::read(&path).await.map_err(BridgeError::Io)?;
        debug!(uri = %uri, size = data.len(), "Resolved local content");
        Ok(Bytes::from(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_to_path() {
        assert_eq!(
            FileContentResolver::to_path("file:///tmp/a.jpg").unwrap(),
            PathBuf::from("/tmp/a.jpg")
        );
        assert_eq!(
            FileContentResolver::to_path("/tmp/a.jpg").unwrap(),
            PathBuf::from("/tmp/a.jpg")
        );
        assert!(FileContentResolver::to_path("content://media/1").is_err());
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let resolver = FileContentResolver::new();
        let err = resolver
            .open_local("/tmp/does-not-exist-renderer-test.jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::NotFound(_)));
    }
}

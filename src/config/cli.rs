use crate::domain::ports::Storage;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Artifact storage on the local filesystem, rooted at the artifact directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(path);
        tracing::debug!("Reading {}", full_path.display());
        let data = tokio::fs::read(&full_path).await?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_relative_to_base_path() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("scaler.json"), b"{}").unwrap();

        let storage = LocalStorage::new(dir.path());
        assert_eq!(storage.base_path(), dir.path());
        tokio_test::block_on(async {
            assert_eq!(storage.read_file("scaler.json").await.unwrap(), b"{}");
            assert!(storage.read_file("missing.json").await.is_err());
        });
    }
}

//! Local disk bucket store

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::backend::{hash_key, validate_bucket_name, BucketStore};
use crate::entry::StoredResponse;
use crate::error::StorageError;

/// Local disk bucket store.
///
/// Each bucket is a directory under the base path; entries are JSON files
/// named by the sha256 of the entry key, sharded by the first two hex
/// characters: `<base>/<bucket>/<shard>/<digest>.json`.
pub struct LocalStore {
    base_path: PathBuf,
}

impl LocalStore {
    /// Create a new local store rooted at `base_path`
    pub async fn new(base_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).await?;

        info!("Initialized local cache store at {:?}", base_path);

        Ok(Self { base_path })
    }

    fn bucket_path(&self, bucket: &str) -> Result<PathBuf, StorageError> {
        validate_bucket_name(bucket)?;
        Ok(self.base_path.join(bucket))
    }

    fn entry_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StorageError> {
        let digest = hash_key(key);
        let shard = &digest[..2];
        Ok(self
            .bucket_path(bucket)?
            .join(shard)
            .join(format!("{}.json", digest)))
    }
}

#[async_trait]
impl BucketStore for LocalStore {
    async fn list_buckets(&self) -> Result<Vec<String>, StorageError> {
        let mut names = Vec::new();
        let mut dir = fs::read_dir(&self.base_path).await?;
        while let Some(item) = dir.next_entry().await? {
            if item.file_type().await?.is_dir()
                && let Some(name) = item.file_name().to_str()
            {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<bool, StorageError> {
        let path = self.bucket_path(bucket)?;
        debug!("Deleting bucket at {:?}", path);

        match fs::remove_dir_all(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Option<StoredResponse>, StorageError> {
        let path = self.entry_path(bucket, key)?;

        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::Io(e)),
        };

        let entry: StoredResponse = serde_json::from_slice(&data)?;
        Ok(Some(entry))
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        response: StoredResponse,
    ) -> Result<(), StorageError> {
        let path = self.entry_path(bucket, key)?;
        debug!("Writing cache entry to {:?}", path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let data = serde_json::to_vec(&response)?;

        // Write atomically using a temp file
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &data).await?;
        fs::rename(&temp_path, &path).await?;

        Ok(())
    }

    async fn contains(&self, bucket: &str, key: &str) -> Result<bool, StorageError> {
        let path = self.entry_path(bucket, key)?;
        Ok(fs::try_exists(&path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn entry(body: &'static [u8]) -> StoredResponse {
        StoredResponse::new(
            200,
            vec![("content-type".to_string(), "text/html".to_string())],
            Bytes::from_static(body),
        )
    }

    #[tokio::test]
    async fn test_put_get_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).await.unwrap();

        let key = "GET https://dummyjson.com/products";
        store.put("cache-v1", key, entry(b"[]")).await.unwrap();

        let found = store.get("cache-v1", key).await.unwrap().unwrap();
        assert_eq!(found.status, 200);
        assert_eq!(found.body, Bytes::from_static(b"[]"));
        assert_eq!(found.header("content-type"), Some("text/html"));
    }

    #[tokio::test]
    async fn test_missing_entry_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).await.unwrap();

        assert!(store.get("cache-v1", "GET /missing").await.unwrap().is_none());
        assert!(!store.contains("cache-v1", "GET /missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_and_delete_buckets() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).await.unwrap();

        store.put("app-v1", "GET /a", entry(b"a")).await.unwrap();
        store.put("app-v2", "GET /a", entry(b"a")).await.unwrap();

        assert_eq!(store.list_buckets().await.unwrap(), vec!["app-v1", "app-v2"]);

        assert!(store.delete_bucket("app-v1").await.unwrap());
        assert_eq!(store.list_buckets().await.unwrap(), vec!["app-v2"]);

        // Deleting again reports the bucket as already gone
        assert!(!store.delete_bucket("app-v1").await.unwrap());
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = LocalStore::new(dir.path()).await.unwrap();
            store.put("app-v1", "GET /page", entry(b"body")).await.unwrap();
        }

        let store = LocalStore::new(dir.path()).await.unwrap();
        let found = store.get("app-v1", "GET /page").await.unwrap().unwrap();
        assert_eq!(found.body, Bytes::from_static(b"body"));
    }

    #[tokio::test]
    async fn test_traversal_bucket_name_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path()).await.unwrap();

        let result = store.put("../outside", "GET /a", entry(b"a")).await;
        assert!(matches!(result, Err(StorageError::InvalidBucket(_))));
    }
}

//! In-memory bucket store

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::backend::{validate_bucket_name, BucketStore};
use crate::entry::StoredResponse;
use crate::error::StorageError;

/// In-memory bucket store.
///
/// Used by tests and embedded setups that do not need persistence across
/// restarts. Buckets and entries live in a plain nested map.
#[derive(Default)]
pub struct MemoryStore {
    buckets: RwLock<HashMap<String, HashMap<String, StoredResponse>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in a bucket (test helper)
    pub fn entry_count(&self, bucket: &str) -> usize {
        self.buckets
            .read()
            .get(bucket)
            .map(|b| b.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl BucketStore for MemoryStore {
    async fn list_buckets(&self) -> Result<Vec<String>, StorageError> {
        let mut names: Vec<String> = self.buckets.read().keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<bool, StorageError> {
        Ok(self.buckets.write().remove(bucket).is_some())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Option<StoredResponse>, StorageError> {
        Ok(self
            .buckets
            .read()
            .get(bucket)
            .and_then(|b| b.get(key))
            .cloned())
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        response: StoredResponse,
    ) -> Result<(), StorageError> {
        validate_bucket_name(bucket)?;
        self.buckets
            .write()
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), response);
        Ok(())
    }

    async fn contains(&self, bucket: &str, key: &str) -> Result<bool, StorageError> {
        Ok(self
            .buckets
            .read()
            .get(bucket)
            .is_some_and(|b| b.contains_key(key)))
    }
}

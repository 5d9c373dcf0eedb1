//! Bucket store trait

use async_trait::async_trait;

use crate::entry::StoredResponse;
use crate::error::StorageError;

/// Versioned cache bucket store.
///
/// A bucket is a named namespace of cached response entries. The offline
/// worker keeps exactly one bucket current (its name carries the code
/// version) and purges all others on activation. Implementations must
/// tolerate concurrent writers racing to populate the same bucket.
#[async_trait]
pub trait BucketStore: Send + Sync {
    /// List the names of all existing buckets
    async fn list_buckets(&self) -> Result<Vec<String>, StorageError>;

    /// Delete a whole bucket and every entry inside it.
    ///
    /// Returns `false` if no such bucket existed.
    async fn delete_bucket(&self, bucket: &str) -> Result<bool, StorageError>;

    /// Look up an entry by key
    async fn get(&self, bucket: &str, key: &str) -> Result<Option<StoredResponse>, StorageError>;

    /// Write an entry, creating the bucket if needed.
    ///
    /// Overwrites any existing entry under the same key.
    async fn put(&self, bucket: &str, key: &str, response: StoredResponse)
        -> Result<(), StorageError>;

    /// Check whether an entry exists without reading its body
    async fn contains(&self, bucket: &str, key: &str) -> Result<bool, StorageError>;
}

/// Compute the sha256 hex digest of an entry key.
///
/// Disk backends use this as the file name so that arbitrary URLs map to
/// safe, fixed-length paths.
pub fn hash_key(key: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Validate a bucket name at the storage boundary.
///
/// Bucket names come from configuration and end up as directory names, so
/// anything that could escape the storage root is rejected.
pub fn validate_bucket_name(bucket: &str) -> Result<(), StorageError> {
    if bucket.is_empty() {
        return Err(StorageError::InvalidBucket("empty name".to_string()));
    }
    if !bucket
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(StorageError::InvalidBucket(bucket.to_string()));
    }
    if bucket == "." || bucket == ".." {
        return Err(StorageError::InvalidBucket(bucket.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_key_is_stable_hex() {
        let digest = hash_key("GET https://example.com/");
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, hash_key("GET https://example.com/"));
        assert_ne!(digest, hash_key("GET https://example.com/other"));
    }

    #[test]
    fn test_validate_bucket_name() {
        assert!(validate_bucket_name("storefront-cache-v1").is_ok());
        assert!(validate_bucket_name("app_v2.1").is_ok());
        assert!(validate_bucket_name("").is_err());
        assert!(validate_bucket_name("..").is_err());
        assert!(validate_bucket_name("a/b").is_err());
        assert!(validate_bucket_name("../escape").is_err());
    }
}

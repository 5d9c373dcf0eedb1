//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] bazaar_storage::StorageError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crate::fetch::FetchError),

    #[error("Seeding {url} failed: {reason}")]
    Seed { url: String, reason: String },

    #[error("Worker has not completed install")]
    NotInstalled,

    #[error("Worker is not active")]
    NotActive,

    #[error("Offline fallback page missing from cache")]
    OfflineFallbackMissing,
}

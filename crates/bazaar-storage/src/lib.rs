//! Bazaar Cache Storage Layer
//!
//! This crate provides the versioned cache bucket abstraction for
//! Bazaar Cache, with in-memory and local disk backends.

pub mod backend;
pub mod entry;
pub mod error;
pub mod local;
pub mod memory;

pub use backend::BucketStore;
pub use entry::{entry_key, StoredResponse};
pub use error::StorageError;
pub use local::LocalStore;
pub use memory::MemoryStore;

//! Bazaar Cache Cart Store
//!
//! This crate provides the client-side pending-order store: an ordered
//! list of cart items serialized as one JSON blob under a single key of a
//! key-value storage backend. Purely local, no network involvement.

pub mod error;
pub mod storage;
pub mod store;

pub use error::CartError;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{CartItem, CartStore};

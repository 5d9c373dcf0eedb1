//! Bazaar Cache Catalog Client
//!
//! This crate provides the client for the remote product catalog API,
//! including the reqwest-backed network implementation and the
//! cached-fallback read path used when the catalog is unreachable.

pub mod client;
pub mod error;
pub mod net;
pub mod types;

pub use client::CatalogClient;
pub use error::CatalogError;
pub use net::HttpNetwork;
pub use types::{Product, ProductsResponse};

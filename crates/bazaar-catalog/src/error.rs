//! Catalog error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// The network failed and there is no cached copy. Distinct from an
    /// empty product list, which is a successful response.
    #[error("No cached data available for {0}")]
    NoCachedData(String),

    #[error("Failed to decode catalog response: {0}")]
    Decode(#[from] serde_json::Error),
}

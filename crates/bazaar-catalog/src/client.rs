//! Catalog API client with cached fallback

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

use bazaar_core::{Network, Request};
use bazaar_storage::BucketStore;

use crate::error::CatalogError;
use crate::types::{Product, ProductsResponse};

/// Typed client for the product catalog API.
///
/// Reads go to the network first; when the network fails (or returns a
/// non-success status), the client falls back to whatever the offline
/// worker previously stored for the same URL. A missing entry is reported
/// as [`CatalogError::NoCachedData`], which callers must treat as "no data",
/// not as an empty catalog.
pub struct CatalogClient {
    network: Arc<dyn Network>,
    store: Arc<dyn BucketStore>,
    bucket: String,
    base_url: Url,
}

impl CatalogClient {
    pub fn new(
        network: Arc<dyn Network>,
        store: Arc<dyn BucketStore>,
        bucket: impl Into<String>,
        base_url: Url,
    ) -> Self {
        Self {
            network,
            store,
            bucket: bucket.into(),
            base_url,
        }
    }

    /// Fetch the product list
    pub async fn get_products(&self) -> Result<ProductsResponse, CatalogError> {
        let url = self.endpoint("products");
        self.fetch_json(url).await
    }

    /// Fetch a single product by id
    pub async fn get_product(&self, id: u64) -> Result<Product, CatalogError> {
        let url = self.endpoint(&format!("products/{}", id));
        self.fetch_json(url).await
    }

    fn endpoint(&self, path: &str) -> Url {
        // Base URLs are configured values; a join failure would mean a
        // malformed base caught at startup, so fall back to the base itself.
        self.base_url.join(path).unwrap_or_else(|_| self.base_url.clone())
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let request = Request::get(url.clone());

        match self.network.fetch(&request).await {
            Ok(response) if response.status.is_success() => {
                Ok(serde_json::from_slice(&response.body)?)
            }
            Ok(response) => {
                debug!("Catalog returned {} for {}", response.status, url);
                self.read_cached(&request).await
            }
            Err(e) => {
                debug!("Catalog unreachable for {}: {}", url, e);
                self.read_cached(&request).await
            }
        }
    }

    /// Read the cached copy the offline worker stored for this URL
    async fn read_cached<T: DeserializeOwned>(&self, request: &Request) -> Result<T, CatalogError> {
        let stored = match self.store.get(&self.bucket, &request.cache_key()).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cache lookup failed for {}: {}", request.url, e);
                None
            }
        };

        match stored {
            Some(entry) => {
                debug!("Serving cached catalog data for {}", request.url);
                Ok(serde_json::from_slice(&entry.body)?)
            }
            None => Err(CatalogError::NoCachedData(request.url.to_string())),
        }
    }
}

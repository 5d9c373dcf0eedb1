//! Request and response types, and the network seam

use async_trait::async_trait;
use bytes::Bytes;
use http::{Method, StatusCode};
use thiserror::Error;
use url::Url;

use bazaar_storage::{entry_key, StoredResponse};

/// Errors produced by a failed network fetch.
///
/// These cover transport-level failures only. A response with a non-2xx
/// status is still a response, not a `FetchError`.
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// An outgoing request as seen by the interception layer
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    /// Request body, empty for GET. Carried through on passthrough only;
    /// it never participates in cache keying.
    pub body: Bytes,
}

impl Request {
    pub fn new(method: Method, url: Url, body: Bytes) -> Self {
        Self { method, url, body }
    }

    /// Shorthand for a bodyless GET
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url, Bytes::new())
    }

    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }

    /// Normalized cache key for this request
    pub fn cache_key(&self) -> String {
        entry_key(self.method.as_str(), self.url.as_str())
    }
}

/// A response obtained from the network
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl FetchedResponse {
    pub fn new(status: StatusCode, headers: Vec<(String, String)>, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Whether this response qualifies for caching (exactly HTTP 200)
    pub fn is_cacheable(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// Snapshot this response into a storable entry
    pub fn to_stored(&self) -> StoredResponse {
        StoredResponse::new(self.status.as_u16(), self.headers.clone(), self.body.clone())
    }

    /// Rebuild a response from a stored entry
    pub fn from_stored(stored: StoredResponse) -> Self {
        Self {
            status: StatusCode::from_u16(stored.status).unwrap_or(StatusCode::OK),
            headers: stored.headers,
            body: stored.body,
        }
    }
}

/// The injected network dependency.
///
/// The production implementation lives in `bazaar-catalog` (reqwest); tests
/// substitute stubs to script successes and failures per URL.
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<FetchedResponse, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_includes_method_and_url() {
        let url = Url::parse("https://dummyjson.com/products").unwrap();
        let request = Request::get(url);
        assert_eq!(request.cache_key(), "GET https://dummyjson.com/products");
    }

    #[test]
    fn test_only_200_is_cacheable() {
        let ok = FetchedResponse::new(StatusCode::OK, vec![], Bytes::new());
        let not_found = FetchedResponse::new(StatusCode::NOT_FOUND, vec![], Bytes::new());
        let partial = FetchedResponse::new(StatusCode::PARTIAL_CONTENT, vec![], Bytes::new());

        assert!(ok.is_cacheable());
        assert!(!not_found.is_cacheable());
        assert!(!partial.is_cacheable());
    }

    #[test]
    fn test_stored_round_trip_preserves_response() {
        let response = FetchedResponse::new(
            StatusCode::OK,
            vec![("content-type".to_string(), "application/json".to_string())],
            Bytes::from_static(b"{\"products\":[]}"),
        );

        let rebuilt = FetchedResponse::from_stored(response.to_stored());
        assert_eq!(rebuilt.status, response.status);
        assert_eq!(rebuilt.headers, response.headers);
        assert_eq!(rebuilt.body, response.body);
    }
}

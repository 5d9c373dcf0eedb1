//! Reqwest-backed network implementation

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use bazaar_core::{FetchError, FetchedResponse, Network, Request};

/// Production [`Network`] implementation over reqwest.
pub struct HttpNetwork {
    client: Client,
}

impl HttpNetwork {
    /// Create a client with the given per-request timeout
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &Request) -> Result<FetchedResponse, FetchError> {
        debug!("{} {}", request.method, request.url);

        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone());
        if !request.body.is_empty() {
            builder = builder.body(request.body.clone());
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body: Bytes = response.bytes().await.map_err(map_reqwest_error)?;

        Ok(FetchedResponse::new(status, headers, body))
    }
}

fn map_reqwest_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout(e.to_string())
    } else if e.is_body() || e.is_decode() {
        // The response arrived but its body could not be read
        FetchError::InvalidResponse(e.to_string())
    } else {
        FetchError::Connection(e.to_string())
    }
}

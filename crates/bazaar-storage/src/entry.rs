//! Cached response entries

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored snapshot of a successful response.
///
/// Entries are immutable once written; overwriting an existing key with a
/// newer snapshot is always safe (last write wins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResponse {
    /// HTTP status code (only 200 responses are ever stored)
    pub status: u16,
    /// Response headers as name/value pairs
    pub headers: Vec<(String, String)>,
    /// Response body
    pub body: Bytes,
    /// When this entry was written
    pub stored_at: DateTime<Utc>,
}

impl StoredResponse {
    /// Create a new entry stamped with the current time
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
            stored_at: Utc::now(),
        }
    }

    /// Look up a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Build the normalized entry key for a request: `"{METHOD} {URL}"`.
pub fn entry_key(method: &str, url: &str) -> String {
    format!("{} {}", method, url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_key_format() {
        assert_eq!(
            entry_key("GET", "https://dummyjson.com/products"),
            "GET https://dummyjson.com/products"
        );
    }

    #[test]
    fn test_header_lookup_case_insensitive() {
        let entry = StoredResponse::new(
            200,
            vec![("Content-Type".to_string(), "application/json".to_string())],
            Bytes::from_static(b"{}"),
        );
        assert_eq!(entry.header("content-type"), Some("application/json"));
        assert_eq!(entry.header("x-missing"), None);
    }

    #[test]
    fn test_entry_round_trips_through_json() {
        let entry = StoredResponse::new(
            200,
            vec![("content-type".to_string(), "text/html".to_string())],
            Bytes::from_static(b"<html>offline</html>"),
        );
        let encoded = serde_json::to_string(&entry).unwrap();
        let decoded: StoredResponse = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, entry);
    }
}

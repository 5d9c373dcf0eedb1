//! Caching strategy classification

use serde::{Deserialize, Serialize};

use crate::fetch::Request;

/// The three caching strategies a request can be routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Serve from cache if present; only hit the network on a miss
    CacheFirst,
    /// Always try the network; fall back to cache on failure, nothing beyond
    NetworkFirst,
    /// Try the network; fall back to cache, then to the stored offline page
    OfflineFallback,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::CacheFirst => "cache-first",
            Strategy::NetworkFirst => "network-first",
            Strategy::OfflineFallback => "offline-fallback",
        }
    }
}

/// Adjustable policy inputs for classification
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategyRules {
    /// URL path prefixes served cache-first (build artifacts, icons, manifest)
    #[serde(default)]
    pub cache_first_prefixes: Vec<String>,
    /// Endpoints served network-first (the product catalog list endpoint)
    #[serde(default)]
    pub network_first_endpoints: Vec<String>,
}

/// A single classification rule
#[derive(Debug, Clone)]
enum Matcher {
    /// URL path starts with the given prefix
    PathPrefix(String),
    /// URL path starts with the pattern, or the full URL contains it
    Endpoint(String),
}

impl Matcher {
    fn matches(&self, request: &Request) -> bool {
        match self {
            Matcher::PathPrefix(prefix) => request.url.path().starts_with(prefix.as_str()),
            Matcher::Endpoint(pattern) => {
                request.url.path().starts_with(pattern.as_str())
                    || request.url.as_str().contains(pattern.as_str())
            }
        }
    }
}

/// Ordered rule list mapping requests to strategies.
///
/// Rules are evaluated top to bottom, first match wins, and anything
/// unmatched falls through to [`Strategy::OfflineFallback`]. New policies
/// are added by appending rules, not by editing control flow.
#[derive(Debug, Clone)]
pub struct RequestClassifier {
    rules: Vec<(Matcher, Strategy)>,
}

impl RequestClassifier {
    pub fn new(rules: &StrategyRules) -> Self {
        let mut compiled = Vec::new();
        for prefix in &rules.cache_first_prefixes {
            compiled.push((Matcher::PathPrefix(prefix.clone()), Strategy::CacheFirst));
        }
        for endpoint in &rules.network_first_endpoints {
            compiled.push((Matcher::Endpoint(endpoint.clone()), Strategy::NetworkFirst));
        }
        Self { rules: compiled }
    }

    /// Classify a request, first match wins
    pub fn classify(&self, request: &Request) -> Strategy {
        self.rules
            .iter()
            .find(|(matcher, _)| matcher.matches(request))
            .map(|(_, strategy)| *strategy)
            .unwrap_or(Strategy::OfflineFallback)
    }
}

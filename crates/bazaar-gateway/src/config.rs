//! Configuration loading and management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;
use url::Url;

use bazaar_core::StrategyRules;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default = "default_policy")]
    pub policy: StrategyRules,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Cache bucket configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Base name of the cache bucket
    #[serde(default = "default_cache_name")]
    pub name: String,
    /// Version tag embedded in the bucket name. Changing this string in
    /// any way makes the next activation purge the old bucket.
    #[serde(default = "default_cache_version")]
    pub version: String,
    /// Paths seeded at install time, resolved against the upstream origin
    #[serde(default = "default_seed_paths")]
    pub seed_paths: Vec<String>,
    /// Path of the offline fallback page; must be in the seed set
    #[serde(default = "default_offline_path")]
    pub offline_path: String,
}

impl CacheConfig {
    /// The versioned bucket name, e.g. `storefront-cache-v1`
    pub fn bucket_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}

/// Upstream storefront configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Origin serving the storefront pages and static assets
    #[serde(default = "default_origin")]
    pub origin: String,
    /// Prefix routes mapping incoming paths to other upstream bases
    /// (the catalog API, by default)
    #[serde(default = "default_routes")]
    pub routes: Vec<RouteConfig>,
}

/// A single prefix route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Incoming path prefix
    pub prefix: String,
    /// Target base URL the prefix maps onto
    pub target: String,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: String,
}

/// Catalog API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_url")]
    pub url: String,
    #[serde(default = "default_catalog_timeout")]
    pub timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cache_name() -> String {
    "storefront-cache".to_string()
}

fn default_cache_version() -> String {
    "v1".to_string()
}

fn default_seed_paths() -> Vec<String> {
    vec!["/offline.html".to_string(), "/manifest.json".to_string()]
}

fn default_policy() -> StrategyRules {
    StrategyRules {
        cache_first_prefixes: vec![
            "/manifest.json".to_string(),
            "/icons/".to_string(),
            "/_next/static/".to_string(),
        ],
        network_first_endpoints: vec![default_catalog_url() + "/products"],
    }
}

fn default_offline_path() -> String {
    "/offline.html".to_string()
}

fn default_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_routes() -> Vec<RouteConfig> {
    vec![RouteConfig {
        prefix: "/products".to_string(),
        target: default_catalog_url() + "/products",
    }]
}

fn default_storage_path() -> String {
    "data/cache".to_string()
}

fn default_catalog_url() -> String {
    "https://dummyjson.com".to_string()
}

fn default_catalog_timeout() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            name: default_cache_name(),
            version: default_cache_version(),
            seed_paths: default_seed_paths(),
            offline_path: default_offline_path(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            routes: default_routes(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: default_catalog_url(),
            timeout_secs: default_catalog_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            cache: CacheConfig::default(),
            policy: default_policy(),
            upstream: UpstreamConfig::default(),
            storage: StorageConfig::default(),
            catalog: CatalogConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &str) -> Result<Self> {
        let config_path = Path::new(path);

        if !config_path.exists() {
            info!("Config file not found at {}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        info!("Loaded configuration from {}", path);
        Ok(config)
    }

    /// The upstream origin as a parsed URL
    pub fn origin_url(&self) -> Result<Url> {
        Url::parse(&self.upstream.origin)
            .with_context(|| format!("Invalid upstream origin: {}", self.upstream.origin))
    }

    /// Seed URLs resolved against the upstream origin
    pub fn seed_urls(&self) -> Result<Vec<Url>> {
        let origin = self.origin_url()?;
        self.cache
            .seed_paths
            .iter()
            .map(|p| {
                origin
                    .join(p)
                    .with_context(|| format!("Invalid seed path: {}", p))
            })
            .collect()
    }

    /// Offline fallback URL resolved against the upstream origin
    pub fn offline_url(&self) -> Result<Url> {
        self.origin_url()?
            .join(&self.cache.offline_path)
            .with_context(|| format!("Invalid offline path: {}", self.cache.offline_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_complete() {
        let config = Config::default();
        assert_eq!(config.cache.bucket_name(), "storefront-cache-v1");
        assert_eq!(config.cache.offline_path, "/offline.html");
        assert_eq!(config.catalog.timeout_secs, 5);
        assert_eq!(config.upstream.routes.len(), 1);
        assert!(config
            .policy
            .cache_first_prefixes
            .contains(&"/_next/static/".to_string()));
        assert_eq!(
            config.policy.network_first_endpoints,
            vec!["https://dummyjson.com/products"]
        );
    }

    #[test]
    fn test_version_bump_changes_bucket_name() {
        let mut config = Config::default();
        config.cache.version = "v2".to_string();
        assert_eq!(config.cache.bucket_name(), "storefront-cache-v2");
    }

    #[test]
    fn test_partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [cache]
            version = "v7"

            [policy]
            cache_first_prefixes = ["/assets/"]
            "#,
        )
        .unwrap();

        assert_eq!(config.cache.bucket_name(), "storefront-cache-v7");
        assert_eq!(config.policy.cache_first_prefixes, vec!["/assets/"]);
        assert!(config.policy.network_first_endpoints.is_empty());
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_seed_urls_resolve_against_origin() {
        let config = Config::default();
        let seeds = config.seed_urls().unwrap();
        assert_eq!(seeds[0].as_str(), "http://localhost:3000/offline.html");
        assert_eq!(seeds[1].as_str(), "http://localhost:3000/manifest.json");
    }
}

//! Offline worker lifecycle and fetch interception

use futures::future::try_join_all;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use bazaar_storage::BucketStore;

use crate::error::CoreError;
use crate::fetch::{FetchedResponse, Network, Request};
use crate::strategy::{RequestClassifier, Strategy, StrategyRules};

/// Offline worker configuration
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Name of the current cache bucket, with the code version embedded
    /// (e.g. `storefront-cache-v1`). Any bucket with a different name is
    /// purged on activation; comparison is equality, not ordering.
    pub bucket_name: String,
    /// Resources seeded into the bucket during install. Must include the
    /// offline fallback page.
    pub seed_urls: Vec<Url>,
    /// The offline fallback page served when both network and cache miss
    pub offline_url: Url,
    /// Classification policy
    pub rules: StrategyRules,
}

/// Worker lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Created, not yet seeded
    Parsed,
    /// Seed set stored, waiting to activate
    Installed,
    /// Controlling requests
    Activated,
}

/// Where an intercepted response came from
#[derive(Debug)]
pub enum Served {
    /// Fresh from the network
    Live(FetchedResponse),
    /// A cached snapshot
    Cached(FetchedResponse),
    /// The stored offline fallback page
    Offline(FetchedResponse),
}

impl Served {
    pub fn response(&self) -> &FetchedResponse {
        match self {
            Served::Live(r) | Served::Cached(r) | Served::Offline(r) => r,
        }
    }

    pub fn into_response(self) -> FetchedResponse {
        match self {
            Served::Live(r) | Served::Cached(r) | Served::Offline(r) => r,
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            Served::Live(_) => "live",
            Served::Cached(_) => "cache",
            Served::Offline(_) => "offline",
        }
    }
}

/// The offline resource cache worker.
///
/// One instance per running version. The host runtime wires its three hooks
/// into whatever request-interception mechanism it has: `on_install` before
/// the version goes live, `on_activate` when it takes over, and
/// `on_intercept` for every outgoing request thereafter.
pub struct OfflineWorker {
    store: Arc<dyn BucketStore>,
    network: Arc<dyn Network>,
    classifier: RequestClassifier,
    config: WorkerConfig,
    state: RwLock<WorkerState>,
}

impl OfflineWorker {
    pub fn new(
        config: WorkerConfig,
        store: Arc<dyn BucketStore>,
        network: Arc<dyn Network>,
    ) -> Self {
        let classifier = RequestClassifier::new(&config.rules);
        Self {
            store,
            network,
            classifier,
            config,
            state: RwLock::new(WorkerState::Parsed),
        }
    }

    pub fn state(&self) -> WorkerState {
        *self.state.read()
    }

    pub fn bucket_name(&self) -> &str {
        &self.config.bucket_name
    }

    /// Install hook: fetch and store the seed set.
    ///
    /// Every seed must come back with a 200 and be stored before install
    /// succeeds; a failed seed defers activation so the offline fallback is
    /// guaranteed present once the version is live.
    pub async fn on_install(&self) -> Result<(), CoreError> {
        info!(
            "Installing offline worker (bucket: {}, {} seeds)",
            self.config.bucket_name,
            self.config.seed_urls.len()
        );

        let seeds = self.config.seed_urls.iter().map(|url| self.seed(url));
        try_join_all(seeds).await?;

        *self.state.write() = WorkerState::Installed;
        Ok(())
    }

    async fn seed(&self, url: &Url) -> Result<(), CoreError> {
        let request = Request::get(url.clone());

        let response = self.network.fetch(&request).await.map_err(|e| CoreError::Seed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if !response.is_cacheable() {
            return Err(CoreError::Seed {
                url: url.to_string(),
                reason: format!("status {}", response.status),
            });
        }

        self.store
            .put(
                &self.config.bucket_name,
                &request.cache_key(),
                response.to_stored(),
            )
            .await?;

        debug!("Seeded {}", url);
        Ok(())
    }

    /// Activate hook: purge every bucket that is not the current one.
    ///
    /// Rejected until install has completed, so the seed set (offline page
    /// included) is guaranteed present once the worker controls requests.
    /// Returns the number of buckets purged. Safe to re-run: a stale bucket
    /// left by a crashed activation is removed by the next successful one.
    pub async fn on_activate(&self) -> Result<usize, CoreError> {
        if self.state() == WorkerState::Parsed {
            return Err(CoreError::NotInstalled);
        }

        let buckets = self.store.list_buckets().await?;
        let mut purged = 0;

        for bucket in buckets {
            if bucket != self.config.bucket_name {
                info!("Purging stale cache bucket: {}", bucket);
                if self.store.delete_bucket(&bucket).await? {
                    purged += 1;
                }
            }
        }

        *self.state.write() = WorkerState::Activated;
        info!(
            "Offline worker activated (bucket: {}, purged {} stale)",
            self.config.bucket_name, purged
        );
        Ok(purged)
    }

    /// Fetch interception hook.
    ///
    /// Non-GET requests bypass every strategy and go straight to the
    /// network. GETs are classified and executed; the caller always gets
    /// either a response or the error the terminal step produced.
    pub async fn on_intercept(&self, request: &Request) -> Result<Served, CoreError> {
        if self.state() != WorkerState::Activated {
            return Err(CoreError::NotActive);
        }

        if !request.is_get() {
            let response = self.network.fetch(request).await?;
            return Ok(Served::Live(response));
        }

        let strategy = self.classifier.classify(request);
        debug!("{} {} -> {}", request.method, request.url, strategy.as_str());

        match strategy {
            Strategy::CacheFirst => self.cache_first(request).await,
            Strategy::NetworkFirst => self.network_first(request).await,
            Strategy::OfflineFallback => self.offline_fallback(request).await,
        }
    }

    async fn cache_first(&self, request: &Request) -> Result<Served, CoreError> {
        let key = request.cache_key();

        if let Some(cached) = self.lookup(&key).await {
            return Ok(Served::Cached(cached));
        }

        let response = self.network.fetch(request).await?;
        if response.is_cacheable() {
            self.store_response(&key, &response).await;
        }
        Ok(Served::Live(response))
    }

    async fn network_first(&self, request: &Request) -> Result<Served, CoreError> {
        let key = request.cache_key();

        match self.network.fetch(request).await {
            Ok(response) => {
                if response.is_cacheable() {
                    self.store_response(&key, &response).await;
                }
                Ok(Served::Live(response))
            }
            Err(e) => match self.lookup(&key).await {
                Some(cached) => {
                    debug!("Network failed for {}, serving cached copy", request.url);
                    Ok(Served::Cached(cached))
                }
                // No entry means no data; the failed fetch is the result.
                None => Err(CoreError::Fetch(e)),
            },
        }
    }

    async fn offline_fallback(&self, request: &Request) -> Result<Served, CoreError> {
        match self.network.fetch(request).await {
            Ok(response) => Ok(Served::Live(response)),
            Err(e) => {
                if let Some(cached) = self.lookup(&request.cache_key()).await {
                    debug!("Network failed for {}, serving cached copy", request.url);
                    return Ok(Served::Cached(cached));
                }

                debug!("Network failed for {} ({}), serving offline page", request.url, e);
                let offline_key = Request::get(self.config.offline_url.clone()).cache_key();
                match self.lookup(&offline_key).await {
                    Some(page) => Ok(Served::Offline(page)),
                    None => Err(CoreError::OfflineFallbackMissing),
                }
            }
        }
    }

    /// Best-effort store of a fetched response.
    ///
    /// A storage write failure never affects the in-flight response; it is
    /// logged and the response is delivered regardless.
    async fn store_response(&self, key: &str, response: &FetchedResponse) {
        if let Err(e) = self
            .store
            .put(&self.config.bucket_name, key, response.to_stored())
            .await
        {
            warn!("Failed to cache {}: {}", key, e);
        }
    }

    /// Cache lookup that treats storage errors as misses
    async fn lookup(&self, key: &str) -> Option<FetchedResponse> {
        match self.store.get(&self.config.bucket_name, key).await {
            Ok(Some(stored)) => Some(FetchedResponse::from_stored(stored)),
            Ok(None) => None,
            Err(e) => {
                warn!("Cache lookup failed for {}: {}", key, e);
                None
            }
        }
    }
}

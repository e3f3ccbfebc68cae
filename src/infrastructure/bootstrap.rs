//! Composition root: builds the store, services and stream from [`Config`].

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::adapter::outbound::memory::MemoryStore;
#[cfg(feature = "redis")]
use crate::adapter::outbound::redis::{RedisStore, RedisStreamConsumer, RedisStreamSettings};
use crate::application::cache::QuoteCache;
use crate::application::ingestion::IngestionLoop;
use crate::application::odds::OddsService;
use crate::application::pricing::PricingEngine;
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::port::inbound::Pricer;
use crate::port::outbound::{KeyValueStore, QuoteStream};

/// Which store backs the quote cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Redis,
    Memory,
}

/// Shared services built once per process.
pub struct Services {
    pub pricer: Arc<dyn Pricer>,
    pub cache: Arc<QuoteCache>,
    pub odds: Arc<OddsService>,
}

impl Services {
    /// Ingestion loop over the shared pricer and cache.
    #[must_use]
    pub fn ingestion(&self, config: &Config) -> IngestionLoop {
        IngestionLoop::new(
            Arc::clone(&self.pricer),
            Arc::clone(&self.cache),
            config.stream.backoff,
        )
    }
}

/// Connect the configured store.
///
/// # Errors
///
/// An unreachable Redis server is fatal at startup.
pub async fn build_store(config: &Config, backend: Backend) -> Result<Arc<dyn KeyValueStore>> {
    match backend {
        Backend::Memory => {
            info!("Using in-memory quote store");
            Ok(Arc::new(MemoryStore::new()))
        }
        #[cfg(feature = "redis")]
        Backend::Redis => {
            let store = RedisStore::connect(&config.redis.url, config.redis.scan_count).await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "redis"))]
        Backend::Redis => {
            let _ = config;
            Err(crate::error::ConfigError::InvalidValue {
                field: "redis.url",
                reason: "built without the `redis` feature; use --in-memory".to_string(),
            }
            .into())
        }
    }
}

/// Wire the pricer, cache and read service over `store`.
///
/// # Errors
///
/// Fails when the pricing parameters are invalid.
pub fn build_services(
    config: &Config,
    store: Arc<dyn KeyValueStore>,
    cancel: CancellationToken,
) -> Result<Services> {
    let pricer: Arc<dyn Pricer> = Arc::new(PricingEngine::new(config.optimization_parameters()?));
    let cache = Arc::new(QuoteCache::new(store, config.redis.ttl()));
    let odds = Arc::new(OddsService::new(
        Arc::clone(&pricer),
        Arc::clone(&cache),
        cancel,
    ));

    info!(
        backend = cache.backend_name(),
        ttl_secs = config.redis.ttl_secs,
        "Services initialized"
    );

    Ok(Services {
        pricer,
        cache,
        odds,
    })
}

/// Connect the normalized-odds stream.
///
/// Returns `None` when ingestion is disabled or the in-memory backend is
/// selected; the service then only serves reads and submissions.
///
/// # Errors
///
/// Returns the connection error when the stream server is unreachable.
pub async fn build_stream(
    config: &Config,
    backend: Backend,
) -> Result<Option<Box<dyn QuoteStream>>> {
    if !config.stream.enabled {
        info!("Stream ingestion disabled");
        return Ok(None);
    }
    if backend == Backend::Memory {
        info!("Stream ingestion skipped for in-memory backend");
        return Ok(None);
    }

    #[cfg(feature = "redis")]
    {
        let settings = RedisStreamSettings {
            url: config.stream_url().to_string(),
            key: config.stream.key.clone(),
            group: config.stream.group.clone(),
            consumer: config.stream.consumer.clone(),
            block_ms: usize::try_from(config.stream.block_ms).unwrap_or(usize::MAX),
            read_count: config.stream.read_count,
        };
        let consumer = RedisStreamConsumer::connect(settings).await?;
        Ok(Some(Box::new(consumer)))
    }

    #[cfg(not(feature = "redis"))]
    {
        Err(crate::error::ConfigError::InvalidValue {
            field: "stream.enabled",
            reason: "built without the `redis` feature".to_string(),
        }
        .into())
    }
}

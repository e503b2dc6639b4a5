//! # Memory Cache Provider
//!
//! This module provides an in-memory cache tier using Moka caching.

use bytes::Bytes;
use moka::future::Cache as MokaCache;
use tracing::{debug, warn};

use crate::cache::providers::CacheProvider;
use crate::cache::types::{CacheKey, CacheLookupResult, CacheMetadata, CacheResult};

/// Entry in the memory cache
#[derive(Clone)]
struct CacheEntry {
    /// Cached body bytes
    data: Bytes,
    /// Metadata for the cached response
    metadata: CacheMetadata,
}

/// Memory cache tier implementation using Moka
#[derive(Clone)]
pub struct MemoryCache {
    /// Moka cache for storing entries
    cache: MokaCache<CacheKey, CacheEntry>,
    /// Maximum size for this cache in bytes
    max_size: u64,
}

impl MemoryCache {
    /// Create a new memory cache with the specified size limit
    pub fn new(max_size_bytes: u64) -> Self {
        if max_size_bytes == 0 {
            panic!("Memory cache size must be greater than zero");
        }

        // Size based eviction, weighted by body length
        let cache = MokaCache::builder()
            .weigher(|_k, v: &CacheEntry| v.data.len().try_into().unwrap_or(u32::MAX))
            .max_capacity(max_size_bytes)
            .build();

        debug!(max_size = max_size_bytes, "Memory cache created");

        Self {
            cache,
            max_size: max_size_bytes,
        }
    }
}

#[async_trait::async_trait]
impl CacheProvider for MemoryCache {
    async fn contains(&self, key: &CacheKey) -> CacheResult<bool> {
        Ok(self.cache.contains_key(key))
    }

    async fn get(&self, key: &CacheKey) -> CacheLookupResult {
        if let Some(entry) = self.cache.get(key).await {
            return Ok(Some((entry.data.clone(), entry.metadata.clone())));
        }

        Ok(None)
    }

    async fn put(&self, key: CacheKey, data: Bytes, metadata: CacheMetadata) -> CacheResult<()> {
        let size = metadata.size;

        // A single entry larger than the whole cache cannot be admitted
        if size > self.max_size {
            warn!(
                key = ?key,
                size = size,
                max_size = self.max_size,
                "Entry too large for memory cache, skipping"
            );
            return Ok(());
        }

        let entry = CacheEntry { data, metadata };
        self.cache.insert(key, entry).await;

        Ok(())
    }

    async fn remove(&self, key: &CacheKey) -> CacheResult<()> {
        if self.cache.get(key).await.is_some() {
            self.cache.invalidate(key).await;
            debug!(key = ?key, "Removed entry from memory cache");
        }

        Ok(())
    }

    async fn clear(&self) -> CacheResult<()> {
        self.cache.invalidate_all();

        debug!("Memory cache cleared");
        Ok(())
    }

    async fn len(&self) -> CacheResult<usize> {
        // Settle pending inserts/invalidations so the count is accurate
        self.cache.run_pending_tasks().await;
        Ok(self.cache.entry_count() as usize)
    }
}

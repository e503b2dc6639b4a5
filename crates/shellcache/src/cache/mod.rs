//! # Cache System
//!
//! Named cache buckets holding response snapshots for offline serving. A
//! bucket pairs a memory tier with a persistent file tier; the storage
//! registry creates buckets lazily by name.

// Module declarations
mod bucket;
pub mod providers;
mod storage;
mod types;

// Re-export primary types from our various modules
pub use bucket::CacheBucket;
pub use storage::CacheStorage;
pub use types::{CacheConfig, CacheKey, CacheLookupResult, CacheMetadata, CacheResult};

pub use providers::{CacheProvider, FileCache, MemoryCache};

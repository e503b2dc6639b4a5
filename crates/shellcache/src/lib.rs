//! # Shellcache
//!
//! An offline-first asset cache for a single web application. A named,
//! version-tagged cache bucket is populated with a fixed manifest of static
//! assets at install time; after that every request is answered cache-first,
//! falling back to the network on a miss.
//!
//! The host event loop owns event sourcing: construct one [`OfflineWorker`]
//! at startup, await [`OfflineWorker::install`] before routing any request,
//! then call [`OfflineWorker::intercept`] per request.
//!
//! ## Features
//!
//! - All-or-nothing manifest precaching into a version-tagged bucket
//! - Cache-first interception with network fallback, no write-on-miss
//! - Memory tier in front of a persistent disk tier per bucket
//! - Pluggable network transport behind the [`Fetcher`] trait

pub mod builder;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod worker;

#[cfg(test)]
pub(crate) mod test_utils;

pub use builder::WorkerConfigBuilder;
pub use cache::{CacheBucket, CacheConfig, CacheKey, CacheMetadata, CacheStorage};
pub use config::WorkerConfig;
pub use error::WorkerError;
pub use fetch::{FetchRequest, FetchResponse, Fetcher, HttpFetcher};
pub use worker::{OfflineWorker, WorkerState};

// Re-export client utilities
pub use client::create_client;

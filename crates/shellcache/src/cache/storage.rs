//! # Cache Storage
//!
//! Registry of named cache buckets under one root directory. Buckets are
//! created lazily on first open and handed out as shared handles; deleting
//! a bucket drops its handle and removes its directory. Nothing here
//! deletes stale version tags automatically.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::fs;
use tokio::io;
use tracing::debug;

use crate::cache::bucket::CacheBucket;
use crate::cache::types::CacheConfig;

/// Storage for named cache buckets
pub struct CacheStorage {
    root: PathBuf,
    config: Arc<CacheConfig>,
    buckets: Mutex<HashMap<String, Arc<CacheBucket>>>,
}

impl CacheStorage {
    /// Create storage with the specified configuration
    pub async fn new(mut config: CacheConfig) -> io::Result<Self> {
        // If no disk cache path provided, use system temp
        if config.disk_cache_path.is_none() {
            let temp_dir = std::env::temp_dir();
            config.disk_cache_path = Some(temp_dir.join("shellcache"));
        }

        let root = config.disk_cache_path.as_ref().unwrap().clone();

        if config.enabled && config.max_disk_cache_size > 0 {
            fs::create_dir_all(&root).await?;
        }

        Ok(Self {
            root,
            config: Arc::new(config),
            buckets: Mutex::new(HashMap::new()),
        })
    }

    fn bucket_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Open the bucket with the given name, creating it if absent. Returns
    /// a shared handle; repeated opens of the same name yield the same
    /// bucket.
    pub async fn open(&self, name: &str) -> io::Result<Arc<CacheBucket>> {
        if let Some(bucket) = self.buckets.lock().get(name) {
            return Ok(bucket.clone());
        }

        let bucket =
            Arc::new(CacheBucket::new(name, self.bucket_dir(name), self.config.clone()).await?);

        // Another task may have opened the same name concurrently; keep
        // whichever handle landed first
        let mut buckets = self.buckets.lock();
        let bucket = buckets
            .entry(name.to_owned())
            .or_insert(bucket)
            .clone();

        debug!(bucket = name, "Opened cache bucket");
        Ok(bucket)
    }

    /// Whether a bucket with the given name exists, either open in this
    /// process or persisted on disk
    pub async fn has(&self, name: &str) -> io::Result<bool> {
        if self.buckets.lock().contains_key(name) {
            return Ok(true);
        }

        if self.config.enabled && self.config.max_disk_cache_size > 0 {
            return fs::try_exists(self.bucket_dir(name)).await;
        }

        Ok(false)
    }

    /// Delete the bucket with the given name, dropping its handle and
    /// removing its directory. Returns whether anything existed.
    pub async fn delete(&self, name: &str) -> io::Result<bool> {
        let existed = self.buckets.lock().remove(name).is_some();

        let dir = self.bucket_dir(name);
        match fs::remove_dir_all(&dir).await {
            Ok(()) => {
                debug!(bucket = name, "Deleted cache bucket");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(existed),
            Err(e) => Err(e),
        }
    }

    /// Names of all known buckets, open or persisted, sorted
    pub async fn names(&self) -> io::Result<Vec<String>> {
        let mut names: Vec<String> = self.buckets.lock().keys().cloned().collect();

        if self.config.enabled
            && self.config.max_disk_cache_size > 0
            && fs::try_exists(&self.root).await?
        {
            let mut entries = fs::read_dir(&self.root).await?;
            while let Some(entry) = entries.next_entry().await? {
                if !entry.file_type().await?.is_dir() {
                    continue;
                }
                let file_name = entry.file_name();
                let Some(name) = file_name.to_str() else {
                    continue;
                };
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_owned());
                }
            }
        }

        names.sort();
        Ok(names)
    }
}

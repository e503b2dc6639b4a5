//! # Cache Providers
//!
//! The storage tiers backing a cache bucket: an in-memory tier and a
//! persistent file tier behind a common provider trait.

pub mod file;
pub mod memory;
pub mod provider;

pub use file::FileCache;
pub use memory::MemoryCache;
pub use provider::CacheProvider;

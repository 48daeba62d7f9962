//! Cache Module
//!
//! Provides bounded in-memory caching with per-entry and global TTL expiration.

mod entry;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::{effective_ttl, CacheRecord};
pub use shared::Cache;
pub use stats::CacheStats;
pub use store::{CacheStore, OverflowPolicy};

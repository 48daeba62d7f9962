//! TTL Cache - A bounded in-memory key/value cache
//!
//! Provides per-entry and global TTL expiry, a hard capacity ceiling, lazy
//! cleanup on every read and an optional periodic sweep.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStats, CacheStore, OverflowPolicy};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use tasks::{spawn_sweep_task, SweepHandle};

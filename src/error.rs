//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The cache held `max_entries` entries when an insert was attempted
    #[error("Cache overflow: capacity of {max_entries} entries reached")]
    Overflow {
        /// Configured capacity of the cache
        max_entries: usize,
    },

    /// Invalid engine or sweep configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;

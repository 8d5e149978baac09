//! Shared types, config, cache, and error definitions for the ER wait estimator.

pub mod cache;
pub mod config;
pub mod error;
pub mod types;

pub use cache::ResponseCache;
pub use config::AppConfig;
pub use error::Error;
pub use types::*;

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;

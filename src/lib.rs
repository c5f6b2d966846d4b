//! Kudzu: a recursive, concurrent mirroring crawler
//!
//! This crate implements a crawler that fetches a set of seed addresses,
//! extracts outbound links from each fetched page, and recursively follows
//! newly discovered links up to a bounded depth. Every successfully fetched
//! page is handed to caller-registered treatment callbacks (by default, a
//! filesystem mirror). A follow/skip policy decides which discovered links
//! propagate.

pub mod config;
pub mod crawler;
pub mod page;
pub mod policy;
pub mod treatment;

use thiserror::Error;

/// Main error type for kudzu operations
#[derive(Debug, Error)]
pub enum KudzuError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid link pattern: {0}")]
    InvalidPattern(String),
}

/// Result type alias for kudzu operations
pub type Result<T> = std::result::Result<T, KudzuError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Crawler, FetchCounter};
pub use page::Page;
pub use policy::{Disposition, Policy};
pub use treatment::{SaveToRepository, Treatment};

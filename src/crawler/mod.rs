//! Crawler module: fetching, link extraction, and crawl orchestration
//!
//! This module contains the crawl core:
//! - The recursive, concurrently fanning-out engine
//! - The HTTP fetch collaborator
//! - Byte-level link extraction driven by policies
//! - The process-wide fetch counter

mod counter;
mod engine;
mod extractor;
mod fetcher;

pub use counter::FetchCounter;
pub use engine::Crawler;
pub use extractor::extract_links;
pub use fetcher::{build_http_client, fetch_url};

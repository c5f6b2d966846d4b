//! Process-wide fetch counter
//!
//! One counter is shared by every concurrent crawl branch of an engine
//! instance. It only ever goes up and is never reset mid-crawl; it exists
//! for observability, not correctness.

use std::sync::atomic::{AtomicU64, Ordering};

/// A concurrency-safe, monotonically increasing count of initiated fetches
#[derive(Debug, Default)]
pub struct FetchCounter(AtomicU64);

impl FetchCounter {
    /// Creates a counter starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the counter and returns the new value
    ///
    /// Concurrent increments never lose updates; each caller observes a
    /// distinct value.
    pub fn increment(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Reads the current value
    pub fn read(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

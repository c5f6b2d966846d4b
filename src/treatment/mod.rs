//! Treatment callbacks applied to fetched pages
//!
//! A treatment is a caller-supplied side effect invoked once per
//! successfully fetched page. The engine serializes treatment execution
//! behind a process-wide lock, so implementations never observe overlapping
//! invocations, but they must not block indefinitely or all crawling stalls.
//!
//! A treatment error is fatal to that treatment invocation only: the engine
//! logs it and the crawl continues.

mod save;

pub use save::SaveToRepository;

use crate::page::Page;

/// A side-effecting callback invoked once per successfully fetched page
pub trait Treatment: Send + Sync {
    /// Applies this treatment to one page
    fn apply(&self, page: &Page) -> anyhow::Result<()>;
}

impl<F> Treatment for F
where
    F: Fn(&Page) -> anyhow::Result<()> + Send + Sync,
{
    fn apply(&self, page: &Page) -> anyhow::Result<()> {
        self(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_closures_are_treatments() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);

        let treatment = |_page: &Page| -> anyhow::Result<()> {
            CALLS.fetch_add(1, Ordering::SeqCst);
            Ok(())
        };

        let page = Page::new("https://example.com/", Vec::new());
        treatment.apply(&page).unwrap();
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }
}

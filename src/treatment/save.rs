//! Filesystem mirror treatment
//!
//! Writes each page's content under a directory derived from its address:
//! the host's dot-separated labels become path components, followed by the
//! address path itself. Filenames carry a timestamp suffix so repeated
//! visits to the same address never collide.

use crate::page::Page;
use crate::treatment::Treatment;
use anyhow::Context;
use std::path::PathBuf;
use url::Url;

/// Timestamp suffix appended to every mirrored filename
const TIMESTAMP_FORMAT: &str = "%-d-%b-%Y-%H:%M:%S%.3f";

/// The default persistence treatment: mirrors pages into a directory tree
#[derive(Debug, Clone)]
pub struct SaveToRepository {
    root: PathBuf,
}

impl SaveToRepository {
    /// Creates a mirror treatment rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Derives the target directory and filename stem for an address
    ///
    /// Returns `None` when the address does not parse into a storage path,
    /// in which case persistence is skipped for that page.
    fn destination(&self, address: &str) -> Option<(PathBuf, String)> {
        let parsed = Url::parse(address).ok()?;
        let host = parsed.host_str()?;

        let host = match parsed.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        let mut dir = self.root.clone();
        for label in host.split('.') {
            dir.push(label);
        }

        let path = parsed.path();
        let name = if path == "/" {
            "default.html".to_string()
        } else {
            for segment in path.split('/').filter(|s| !s.is_empty()) {
                dir.push(segment);
            }
            path.rsplit('/').next().unwrap_or_default().to_string()
        };

        Some((dir, name))
    }
}

impl Treatment for SaveToRepository {
    fn apply(&self, page: &Page) -> anyhow::Result<()> {
        let (dir, name) = match self.destination(page.address()) {
            Some(dest) => dest,
            None => {
                tracing::debug!(
                    address = %page.address(),
                    "address does not map to a storage path, skipping persistence"
                );
                return Ok(());
            }
        };

        std::fs::create_dir_all(&dir)
            .with_context(|| format!("creating mirror directory {}", dir.display()))?;

        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT);
        let file = dir.join(format!("{}-{}", name, timestamp));

        std::fs::write(&file, page.content())
            .with_context(|| format!("writing mirrored page {}", file.display()))?;

        tracing::info!(address = %page.address(), file = %file.display(), "mirrored page");

        Ok(())
    }
}

//! Page value object
//!
//! A `Page` pairs the address a fetch was issued for with the raw bytes the
//! fetch returned. Pages are immutable once constructed; the engine owns a
//! page for the duration of one crawl step and hands it to treatments by
//! reference.

/// A fetched page: the address it came from and its raw content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    address: String,
    content: Vec<u8>,
}

impl Page {
    /// Creates a new page from an address and the bytes fetched from it
    pub fn new(address: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            address: address.into(),
            content: content.into(),
        }
    }

    /// The address this page was fetched from
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The raw byte payload returned by the fetch
    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

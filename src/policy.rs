//! Follow/skip policies for discovered links
//!
//! A policy is a named rule set: an ordered list of byte-pattern matchers
//! used to locate candidate addresses inside page content, plus a single
//! disposition applied to every match. Policies are immutable and stateless;
//! one instance may be shared freely across concurrent crawl branches.
//!
//! The disposition is a consumer-side instruction: the extractor always runs
//! the matchers, and it is the engine that refuses to enqueue matches from a
//! `Skip` policy.

use crate::ConfigError;
use regex::bytes::Regex;

/// The pattern recognizing an address-shaped token: a scheme prefix followed
/// by a run of non-terminator bytes and exactly one terminator from the set
/// {space, `"`, `>`, `\`}. The terminator is part of the match and stripped
/// by the extractor. An address at end-of-content with no terminator does
/// not match.
pub(crate) const ADDRESS_PATTERN: &str = r#"(?-u)https?://[^" \\>]*( |"|\\|>)"#;

/// Whether a policy's matches should be followed or skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Matches are candidates for recursive crawling
    Follow,
    /// Matches are located but never enqueued
    Skip,
}

/// An immutable rule set: ordered matchers plus one disposition
#[derive(Debug, Clone)]
pub struct Policy {
    matchers: Vec<Regex>,
    disposition: Disposition,
}

impl Policy {
    /// The well-known policy that follows every address-shaped token
    pub fn accept_all() -> Self {
        Self {
            matchers: vec![default_matcher()],
            disposition: Disposition::Follow,
        }
    }

    /// The well-known policy that locates every address-shaped token but
    /// skips them all
    pub fn reject_all() -> Self {
        Self {
            matchers: vec![default_matcher()],
            disposition: Disposition::Skip,
        }
    }

    /// Builds a policy from caller-supplied patterns
    ///
    /// An empty pattern list yields the default address matcher. Patterns
    /// that fail to compile are reported as [`ConfigError::InvalidPattern`].
    pub fn from_patterns(patterns: &[String], disposition: Disposition) -> Result<Self, ConfigError> {
        if patterns.is_empty() {
            return Ok(Self {
                matchers: vec![default_matcher()],
                disposition,
            });
        }

        let mut matchers = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let matcher = Regex::new(pattern)
                .map_err(|e| ConfigError::InvalidPattern(format!("{}: {}", pattern, e)))?;
            matchers.push(matcher);
        }

        Ok(Self {
            matchers,
            disposition,
        })
    }

    /// The ordered pattern matchers of this policy
    pub fn matchers(&self) -> &[Regex] {
        &self.matchers
    }

    /// The disposition applied to every match
    pub fn disposition(&self) -> Disposition {
        self.disposition
    }
}

/// Compiles the default address-shaped token matcher
fn default_matcher() -> Regex {
    // The pattern is a compile-time constant, so this cannot fail.
    Regex::new(ADDRESS_PATTERN).expect("default address pattern must compile")
}

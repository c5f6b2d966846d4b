//! Link extraction from raw page content
//!
//! The extractor scans arbitrary bytes (not guaranteed to be valid markup)
//! for address-shaped tokens using a policy's matchers. It never fails:
//! malformed input simply yields no matches.

use crate::policy::Policy;

/// Extracts candidate addresses from raw page content
///
/// For each matcher in the policy, in order, the content is scanned left to
/// right and every match is returned with its trailing terminator byte
/// stripped. Every occurrence is enumerated, including repeats of the same
/// address. `limit` caps the number of matches taken per matcher; a negative
/// limit means unlimited.
///
/// Matching always runs regardless of the policy's disposition; honoring a
/// `Skip` disposition is the caller's job.
///
/// # Arguments
///
/// * `content` - The raw page bytes to scan
/// * `policy` - The policy whose matchers locate candidate addresses
/// * `limit` - Per-matcher match cap (negative for unlimited)
///
/// # Returns
///
/// The candidate addresses in order of appearance, empty when nothing
/// matches
pub fn extract_links(content: &[u8], policy: &Policy, limit: i64) -> Vec<String> {
    let mut links = Vec::new();

    for matcher in policy.matchers() {
        let cap = if limit < 0 { usize::MAX } else { limit as usize };

        for found in matcher.find_iter(content).take(cap) {
            let matched = found.as_bytes();
            // The match always ends with exactly one terminator byte, which
            // is consumed by the pattern but excluded from the address.
            let address = &matched[..matched.len() - 1];
            links.push(String::from_utf8_lossy(address).into_owned());
        }
    }

    links
}

//! HTTP cache control module
//!
//! `ETag` generation and `If-None-Match` handling for conditional requests.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Generate a quoted `ETag` from file content, e.g. `"a1b2c3"`.
///
/// A fast non-cryptographic hash is enough here; the tag only needs to
/// change when the content changes.
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}

/// Check whether the client's `If-None-Match` header matches the `ETag`.
///
/// Handles single tags, comma-separated lists, and the `*` wildcard.
/// Returns true when a 304 should be sent.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag
            .split(',')
            .any(|e| e.trim() == etag || e.trim() == "*")
    })
}

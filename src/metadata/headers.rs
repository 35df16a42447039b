//! Raw object metadata as delivered by the storage backend.

use std::collections::BTreeMap;

/// Ordered header name to value mapping, kept exactly as the backend sent it.
pub type Headers = BTreeMap<String, String>;

pub const CONTENT_LENGTH: &str = "content-length";
pub const CONTENT_TYPE: &str = "content-type";
pub const LAST_MODIFIED: &str = "last-modified";
pub const ETAG: &str = "etag";

// == Header Lookup ==
/// Returns the value stored under `name`, matching header names case-insensitively.
///
/// An exact match wins over a case-folded one so that verbatim keys stay
/// cheap to look up.
pub fn header_value<'a>(meta: &'a Headers, name: &str) -> Option<&'a str> {
    if let Some(value) = meta.get(name) {
        return Some(value.as_str());
    }
    meta.iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

//! Name and namespace syntax.

use regex::Regex;
use std::sync::LazyLock;

/// Longest label accepted by DNS-1123.
const DNS1123_LABEL_MAX_LEN: usize = 63;
const DNS1123_LABEL_PATTERN: &str = "^[a-z0-9]([-a-z0-9]*[a-z0-9])?$";

static DNS1123_LABEL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(DNS1123_LABEL_PATTERN).ok());

/// Whether `value` is a lowercase RFC 1123 label (at most 63 characters).
pub fn is_dns1123_label(value: &str) -> bool {
    if value.len() > DNS1123_LABEL_MAX_LEN {
        return false;
    }
    DNS1123_LABEL
        .as_ref()
        .is_some_and(|regex| regex.is_match(value))
}

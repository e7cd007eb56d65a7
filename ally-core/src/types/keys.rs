//! Dismissal key derivation.
//!
//! A dismissal key is a stable fingerprint for "the same defect" across
//! re-scans: alphanumeric-only, length-capped, derived from content that
//! survives re-rendering (e.g. image src + alt text). Query strings are
//! stripped from URLs first so cache-busting parameters do not split one
//! defect into many dismissal records.

use crate::constants::DISMISSAL_KEY_MAX_LEN;

/// Normalize one content fragment: drop everything but ASCII alphanumerics.
fn sanitize(fragment: &str) -> String {
    fragment.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Strip the query string (and fragment) from a URL-ish string.
pub fn strip_query(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

/// Build a dismissal key from an ordered set of content fragments.
///
/// Fragments are sanitized individually, concatenated, and capped at
/// `DISMISSAL_KEY_MAX_LEN` characters. Identical content always yields an
/// identical key; empty content yields an empty key (callers treat that as
/// non-dismissable).
pub fn dismissal_key(fragments: &[&str]) -> String {
    let mut key = String::new();
    for fragment in fragments {
        key.push_str(&sanitize(fragment));
        if key.len() >= DISMISSAL_KEY_MAX_LEN {
            break;
        }
    }
    key.truncate(DISMISSAL_KEY_MAX_LEN);
    key
}

/// Key for an image defect: src with query stripped + alt text.
pub fn image_key(src: &str, alt: &str) -> String {
    dismissal_key(&[strip_query(src), alt])
}

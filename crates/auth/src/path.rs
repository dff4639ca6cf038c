//! Request path canonicalization.
//!
//! Zones are resolved on the percent-decoded path, the same text the router
//! extracts parameters from. Paths whose decoded form is ambiguous are
//! refused before any zone is consulted.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

/// Decode `raw` for zone matching, or `None` when it is not canonical.
///
/// Refused: `;` path parameters, backslashes, encoded `/` or `\`, empty
/// segments (a single trailing slash is allowed), `.`/`..` segments in either
/// the raw or decoded form, invalid UTF-8 and control characters.
pub fn canonical_path(raw: &str) -> Option<Cow<'_, str>> {
    if raw.contains([';', '\\']) {
        return None;
    }
    let upper = raw.to_ascii_uppercase();
    if upper.contains("%2F") || upper.contains("%5C") {
        return None;
    }

    let decoded = percent_decode_str(raw).decode_utf8().ok()?;
    if decoded.contains([';', '\\']) || decoded.chars().any(char::is_control) {
        return None;
    }

    let body = decoded.strip_prefix('/').unwrap_or(&*decoded);
    let body = body.strip_suffix('/').unwrap_or(body);
    if !body.is_empty() && body.split('/').any(|s| s.is_empty() || s == "." || s == "..") {
        return None;
    }

    Some(decoded)
}

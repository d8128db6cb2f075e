//! Filename extraction and sanitization for downloaded results.
//!
//! Binary responses from the server carry a `Content-Disposition` header
//! naming the produced file. This module extracts that name (handling RFC
//! 5987 `UTF-8''` percent-encoding) and strips characters that are invalid
//! on common filesystems, so a directory output target can be resolved to a
//! safe file path.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::header::{CONTENT_DISPOSITION, HeaderMap};

/// Placeholder used when a response names no file.
pub const DEFAULT_FILENAME: &str = "unknown_filename";

/// Matches `filename=` or `filename*=` up to the next parameter separator.
#[allow(clippy::expect_used)]
static FILENAME_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)filename\*?=([^;]+)").expect("filename regex is valid") // Static pattern, safe to panic
});

/// Derives a sanitized filename from response headers.
///
/// Returns `default` unchanged when the `Content-Disposition` header is
/// absent, unreadable, or carries no filename parameter. Pure function; the
/// same headers always yield the same name.
#[must_use]
pub fn response_filename(headers: &HeaderMap, default: &str) -> String {
    let Some(disposition) = headers
        .get(CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
    else {
        return default.to_string();
    };

    parse_content_disposition(disposition)
        .map(|name| sanitize_filename(&name))
        .unwrap_or_else(|| default.to_string())
}

/// Parses a Content-Disposition header value to extract the filename.
///
/// Handles:
/// - `attachment; filename="example.pdf"`
/// - `attachment; filename=example.pdf`
/// - `attachment; filename*=UTF-8''example%20file.pdf` (RFC 5987)
pub(crate) fn parse_content_disposition(header: &str) -> Option<String> {
    let captured = FILENAME_PARAM.captures(header)?.get(1)?.as_str();
    // One pass so mixed quote nesting ('"x"') is stripped fully
    let value = captured.trim_matches(|c: char| c == ' ' || c == '"' || c == '\'');
    if value.is_empty() {
        return None;
    }

    if let Some(encoded) = strip_rfc5987_prefix(value) {
        let decoded = match urlencoding::decode(encoded) {
            Ok(decoded) => decoded.into_owned(),
            // Not valid percent-encoded UTF-8, keep the raw remainder
            Err(_) => encoded.to_string(),
        };
        return Some(decoded);
    }

    Some(value.to_string())
}

/// Strips an RFC 5987 `UTF-8''` charset prefix, case-insensitive.
fn strip_rfc5987_prefix(value: &str) -> Option<&str> {
    let prefix = value.get(..7)?;
    if prefix[..5].eq_ignore_ascii_case("utf-8") && &prefix[5..7] == "''" {
        return value.get(7..);
    }
    None
}

/// Sanitizes a filename for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems, on every
/// platform rather than just the host's:
/// `< > : " / \ | ? *`
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c => c,
        })
        .collect()
}

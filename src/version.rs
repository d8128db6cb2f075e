//! Numeric version comparison for server capability gating.
//!
//! Server versions arrive as dotted strings (`"1.3.2"`) but occasionally carry
//! suffixes or packaging noise (`"v1.3.2-rc1"`). Comparison therefore works on
//! the digit runs alone: each run becomes one numeric component, shorter
//! sequences are zero-padded, and strings without any digits compare equal so
//! that a malformed version never blocks an operation.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

/// Version assumed when the server has not advertised one.
pub const UNKNOWN_VERSION: &str = "0.0.0";

#[allow(clippy::expect_used)]
static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+").expect("digit run regex is valid") // Static pattern, safe to panic
});

/// Splits a version string into its numeric components.
///
/// Non-digit characters act as separators and are otherwise ignored, so
/// `"v1.3.2-rc1"` yields `[1, 3, 2, 1]` and `"nightly"` yields `[]`. Runs too
/// large for `u64` saturate instead of failing.
#[must_use]
pub fn version_components(version: &str) -> Vec<u64> {
    DIGIT_RUN
        .find_iter(version)
        .map(|run| run.as_str().parse::<u64>().unwrap_or(u64::MAX))
        .collect()
}

/// Compares two version strings componentwise.
///
/// The shorter component sequence is zero-padded, so `"1.3"` equals
/// `"1.3.0"`. Inputs without digits produce empty sequences and compare
/// `Equal`; this function never fails.
///
/// # Example
///
/// ```
/// use std::cmp::Ordering;
/// use stirling_pdf_client::version::compare_versions;
///
/// assert_eq!(compare_versions("1.3.10", "1.3.2"), Ordering::Greater);
/// assert_eq!(compare_versions("1.3", "1.3.0"), Ordering::Equal);
/// ```
#[must_use]
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let left = version_components(a);
    let right = version_components(b);
    let len = left.len().max(right.len());

    for i in 0..len {
        let l = left.get(i).copied().unwrap_or(0);
        let r = right.get(i).copied().unwrap_or(0);
        match l.cmp(&r) {
            Ordering::Equal => {}
            other => return other,
        }
    }

    Ordering::Equal
}

/// Returns true when `version` is at least `minimum`.
#[must_use]
pub fn version_at_least(version: &str, minimum: &str) -> bool {
    compare_versions(version, minimum) != Ordering::Less
}

//! User-Agent string for client HTTP traffic.

/// Default User-Agent identifying this client and its version.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("stirling-pdf-client/{version}")
}

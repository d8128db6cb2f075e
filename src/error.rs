//! Error types for the Stirling PDF client.
//!
//! One structured error enum covers the whole crate: local parameter
//! validation, transport failures, server status rejections, capability
//! gating, response decoding, and file I/O.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while talking to a Stirling PDF server.
#[derive(Debug, Error)]
pub enum Error {
    /// The configured base URL could not be parsed.
    #[error("invalid base URL: {url}")]
    InvalidBaseUrl {
        /// The invalid URL string.
        url: String,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout requesting {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The server answered with a non-2xx status code.
    #[error("{reason} (HTTP {status}) at {url}: {body}")]
    Status {
        /// The URL that returned the error status.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// Human-readable reason derived from the status code.
        reason: String,
        /// Raw response body text, kept for diagnostics.
        body: String,
    },

    /// The connected server is too old for the requested operation.
    #[error("server version {actual} does not support this operation, requires at least {required}")]
    UnsupportedVersion {
        /// Minimum server version the operation declares.
        required: String,
        /// Version the connected server advertised.
        actual: String,
    },

    /// No server status has been cached yet.
    ///
    /// Unreachable through `StirlingClient::connect`, which fails outright
    /// when the status bootstrap fails; this guards direct transport misuse.
    #[error("server status has not been fetched, connect before issuing requests")]
    StatusUnavailable,

    /// Neither a local file nor a server file id was supplied.
    #[error("{operation}: provide a local file, a server file id, or both")]
    MissingInput {
        /// Name of the operation that was invoked.
        operation: &'static str,
    },

    /// The response body did not match the expected JSON shape.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        /// The URL whose response failed to decode.
        url: String,
        /// The underlying decode error.
        #[source]
        source: reqwest::Error,
    },

    /// File system error while reading an upload or writing a result.
    #[error("IO error at {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Creates an invalid base URL error.
    pub fn invalid_base_url(url: impl Into<String>) -> Self {
        Self::InvalidBaseUrl { url: url.into() }
    }

    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates a status error, deriving the reason text from the code.
    pub fn status(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            url: url.into(),
            status,
            reason: status_reason(status),
            body: body.into(),
        }
    }

    /// Creates a capability error carrying both versions.
    pub fn unsupported_version(required: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::UnsupportedVersion {
            required: required.into(),
            actual: actual.into(),
        }
    }

    /// Creates a missing-input validation error.
    pub fn missing_input(operation: &'static str) -> Self {
        Self::MissingInput { operation }
    }

    /// Creates a decode error from a reqwest error.
    pub fn decode(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Decode {
            url: url.into(),
            source,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Maps an HTTP status code to the reason text used in [`Error::Status`].
#[must_use]
pub(crate) fn status_reason(status: u16) -> String {
    match status {
        400 => "Bad request".to_string(),
        401 => "Unauthorized".to_string(),
        403 => "Forbidden".to_string(),
        404 => "Not found".to_string(),
        405 => "Method not allowed".to_string(),
        413 => "Payload too large".to_string(),
        422 => "Unprocessable entity".to_string(),
        500 => "Internal server error".to_string(),
        502 => "Bad gateway".to_string(),
        503 => "Service unavailable".to_string(),
        504 => "Gateway timeout".to_string(),
        other => format!("Request failed with status code {other}"),
    }
}

// Note on From trait implementations:
// There is deliberately no `From<reqwest::Error>` or `From<std::io::Error>`
// here. Those sources carry no URL or path, so a blanket conversion would
// produce context-free errors; the helper constructors force each call site
// to attach the context it has.

//! Stirling PDF Client Library
//!
//! This library provides a typed async client for a remote Stirling PDF
//! server, wrapping its HTTP endpoints in plain Rust methods that upload
//! local documents and stream the processed results back to disk.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`client`] - High-level client grouping the endpoint families
//! - [`transport`] - Shared HTTP transport with status caching and version gating
//! - [`api`] - Typed endpoint wrappers (convert, security, misc, general, filter, info)
//! - [`filename`] - Content-Disposition parsing and filename sanitization
//! - [`save`] - Streaming persistence of binary responses
//! - [`version`] - Lenient numeric version comparison
//!
//! - [`error`] - Error type shared across the crate

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod client;
pub mod error;
pub mod filename;
pub mod save;
#[cfg(test)]
pub mod test_support;
pub mod transport;
pub(crate) mod user_agent;
pub mod version;

// Re-export commonly used types
pub use api::FileInput;
pub use client::StirlingClient;
pub use error::Error;
pub use filename::{DEFAULT_FILENAME, response_filename, sanitize_filename};
pub use save::save_response;
pub use transport::{STATUS_ENDPOINT, ServerStatus, Transport};
pub use version::{UNKNOWN_VERSION, compare_versions, version_at_least, version_components};

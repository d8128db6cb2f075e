//! Server information endpoints: uptime, status and load counters.
//!
//! The load counters were added to the server in 1.3.2, so those calls sit
//! behind the transport's capability gate.

use std::sync::Arc;

use serde::Deserialize;

use crate::error::Error;
use crate::transport::{ServerStatus, Transport};

/// Minimum server version for the load-reporting endpoints.
const MIN_LOAD_VERSION: &str = "1.3.2";

/// Request counter for one endpoint, as reported by the load endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoadCount {
    /// Endpoint path the counter belongs to.
    #[serde(default)]
    pub endpoint: String,
    /// Number of requests observed.
    #[serde(default)]
    pub count: u64,
}

/// Read-only server information (`/api/v1/info`).
#[derive(Debug, Clone)]
pub struct InfoApi {
    transport: Arc<Transport>,
}

impl InfoApi {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Server uptime, as the raw text the server reports.
    ///
    /// # Errors
    ///
    /// Fails when the request is refused or cannot be sent.
    pub async fn uptime(&self) -> Result<String, Error> {
        self.transport.get_text("/api/v1/info/uptime").await
    }

    /// Current server status; also refreshes the version used for
    /// capability gating.
    ///
    /// # Errors
    ///
    /// Fails when the request is refused or the body is not a status
    /// document.
    pub async fn status(&self) -> Result<ServerStatus, Error> {
        self.transport.fetch_status().await
    }

    /// Total request count, optionally narrowed to one endpoint path.
    ///
    /// Requires server version 1.3.2.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::UnsupportedVersion`] on older servers, before
    /// any request is sent.
    pub async fn load(&self, endpoint: Option<&str>) -> Result<u64, Error> {
        self.transport
            .gated(MIN_LOAD_VERSION, self.fetch_count("/api/v1/info/load", endpoint))
            .await
    }

    /// Unique-visitor request count, optionally narrowed to one endpoint
    /// path.
    ///
    /// Requires server version 1.3.2.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::UnsupportedVersion`] on older servers, before
    /// any request is sent.
    pub async fn load_unique(&self, endpoint: Option<&str>) -> Result<u64, Error> {
        self.transport
            .gated(
                MIN_LOAD_VERSION,
                self.fetch_count("/api/v1/info/load/unique", endpoint),
            )
            .await
    }

    /// Request counts for every endpoint.
    ///
    /// Requires server version 1.3.2.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::UnsupportedVersion`] on older servers, before
    /// any request is sent.
    pub async fn load_all(&self) -> Result<Vec<LoadCount>, Error> {
        self.transport
            .gated(
                MIN_LOAD_VERSION,
                self.transport.get_json("/api/v1/info/load/all", &[]),
            )
            .await
    }

    /// Unique-visitor request counts for every endpoint.
    ///
    /// Requires server version 1.3.2.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::UnsupportedVersion`] on older servers, before
    /// any request is sent.
    pub async fn load_all_unique(&self) -> Result<Vec<LoadCount>, Error> {
        self.transport
            .gated(
                MIN_LOAD_VERSION,
                self.transport.get_json("/api/v1/info/load/all/unique", &[]),
            )
            .await
    }

    async fn fetch_count(&self, path: &str, endpoint: Option<&str>) -> Result<u64, Error> {
        let query: Vec<(&str, &str)> = endpoint.map(|e| ("endpoint", e)).into_iter().collect();
        self.transport.get_json(path, &query).await
    }
}

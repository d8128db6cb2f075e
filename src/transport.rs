//! Status-aware HTTP transport for the Stirling PDF API.
//!
//! Wraps a `reqwest::Client` with the behavior every endpoint call shares:
//! the server's advertised status (version + health) is fetched once at
//! connect time and cached for capability gating, every response has its
//! status class validated before the body is used, and explicit status
//! checks refresh the cached fields.
//!
//! # Example
//!
//! ```no_run
//! use stirling_pdf_client::transport::Transport;
//!
//! # async fn example() -> Result<(), stirling_pdf_client::Error> {
//! let transport = Transport::connect("http://localhost:8080").await?;
//! println!("server version: {}", transport.server_version());
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::sync::RwLock;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, REFERER};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::Error;
use crate::user_agent;
use crate::version::{UNKNOWN_VERSION, version_at_least};

/// Connect timeout applied to every request.
pub(crate) const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Total request timeout. Server-side PDF work (OCR, large conversions) can
/// run for a very long time, so this is deliberately enormous.
pub(crate) const REQUEST_TIMEOUT_SECS: u64 = 30 * 60 * 60;

/// Path of the status endpoint consulted at connect time.
pub const STATUS_ENDPOINT: &str = "/api/v1/info/status";

/// Version and health pair advertised by the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerStatus {
    /// Server version string, e.g. `"1.3.2"`. Empty when not advertised.
    #[serde(default)]
    pub version: String,
    /// Health indicator, normally `"UP"`.
    #[serde(default)]
    pub status: String,
}

/// HTTP transport with cached server status.
///
/// Built once per server via [`Transport::connect`] and shared across the
/// operation modules. The cached status lives behind a lock; readers get a
/// whole-value snapshot and refreshes replace the whole value, so a
/// half-updated version/health pair is never observable.
#[derive(Debug)]
pub struct Transport {
    http: Client,
    base_url: Url,
    status: RwLock<Option<ServerStatus>>,
}

impl Transport {
    /// Connects to a server and performs the status bootstrap.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBaseUrl`] for an unparseable or non-HTTP base
    /// URL, and propagates any failure of the bootstrap status request.
    /// A transport is never handed out without a populated status cache.
    pub async fn connect(base_url: &str) -> Result<Self, Error> {
        Self::connect_with_timeouts(base_url, CONNECT_TIMEOUT_SECS, REQUEST_TIMEOUT_SECS).await
    }

    /// Connects with explicit timeout values.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`connect`](Self::connect).
    #[instrument(skip_all, fields(base_url = %base_url))]
    pub async fn connect_with_timeouts(
        base_url: &str,
        connect_timeout_secs: u64,
        request_timeout_secs: u64,
    ) -> Result<Self, Error> {
        let base_url = parse_base_url(base_url)?;
        let http = build_client(&base_url, connect_timeout_secs, request_timeout_secs)?;
        let transport = Self {
            http,
            base_url,
            status: RwLock::new(None),
        };

        // Operations cannot be version-gated without a version, so a failed
        // bootstrap fails the whole connect.
        let status = transport.fetch_status().await?;
        debug!(version = %status.version, health = %status.status, "connected");
        Ok(transport)
    }

    /// Fetches the status endpoint and refreshes the cached pair.
    ///
    /// All status-endpoint traffic flows through here, so every explicit
    /// status check also updates the capability-gating state.
    ///
    /// # Errors
    ///
    /// Returns transport/status errors from the request and
    /// [`Error::Decode`] when the body is not a status document.
    #[instrument(skip(self))]
    pub async fn fetch_status(&self) -> Result<ServerStatus, Error> {
        let url = self.endpoint_url(STATUS_ENDPOINT)?;
        let response = self.dispatch(self.http.get(url.clone()), url.as_str()).await?;
        let status: ServerStatus = response
            .json()
            .await
            .map_err(|e| Error::decode(url.as_str(), e))?;

        self.store_status(status.clone());
        debug!(version = %status.version, health = %status.status, "server status refreshed");
        Ok(status)
    }

    /// Returns a snapshot of the cached server status.
    #[must_use]
    pub fn server_status(&self) -> Option<ServerStatus> {
        self.status.read().ok().and_then(|guard| guard.clone())
    }

    /// Returns the cached server version, or `"0.0.0"` when none is cached.
    #[must_use]
    pub fn server_version(&self) -> String {
        self.server_status()
            .map_or_else(|| UNKNOWN_VERSION.to_string(), |status| status.version)
    }

    /// Fails unless the cached server version is at least `min_version`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedVersion`] carrying both versions.
    pub fn require_version(&self, min_version: &str) -> Result<(), Error> {
        let actual = self.server_version();
        if !version_at_least(&actual, min_version) {
            warn!(
                required = min_version,
                actual = %actual,
                "operation refused by capability gate"
            );
            return Err(Error::unsupported_version(min_version, actual));
        }
        Ok(())
    }

    /// Runs `operation` only when the server is at least `min_version`.
    ///
    /// The gate consults the cached version, so a refusal performs zero
    /// network calls; the operation future is dropped unpolled.
    pub(crate) async fn gated<T>(
        &self,
        min_version: &str,
        operation: impl Future<Output = Result<T, Error>>,
    ) -> Result<T, Error> {
        self.require_version(min_version)?;
        operation.await
    }

    /// Issues a GET with optional query parameters.
    pub(crate) async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Response, Error> {
        self.ensure_ready()?;
        let url = self.endpoint_url(path)?;
        let mut request = self.http.get(url.clone());
        if !query.is_empty() {
            request = request.query(query);
        }
        self.dispatch(request, url.as_str()).await
    }

    /// Issues a GET and decodes the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        let response = self.get(path, query).await?;
        let url = response.url().to_string();
        response.json().await.map_err(|e| Error::decode(url, e))
    }

    /// Issues a GET and returns the body as text.
    pub(crate) async fn get_text(&self, path: &str) -> Result<String, Error> {
        let response = self.get(path, &[]).await?;
        let url = response.url().to_string();
        response.text().await.map_err(|e| Error::network(url, e))
    }

    /// Issues a multipart POST (file-family endpoints).
    pub(crate) async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<Response, Error> {
        self.ensure_ready()?;
        let url = self.endpoint_url(path)?;
        let request = self.http.post(url.clone()).multipart(form);
        self.dispatch(request, url.as_str()).await
    }

    /// Issues a urlencoded POST (no-file endpoints).
    pub(crate) async fn post_form(
        &self,
        path: &str,
        fields: &[(&str, &str)],
    ) -> Result<Response, Error> {
        self.ensure_ready()?;
        let url = self.endpoint_url(path)?;
        let request = self.http.post(url.clone()).form(fields);
        self.dispatch(request, url.as_str()).await
    }

    /// Returns a reference to the underlying reqwest client.
    ///
    /// This can be used for advanced operations not covered by this wrapper.
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.http
    }

    /// Base URL this transport talks to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a prepared request and validates the response status class.
    async fn dispatch(&self, request: RequestBuilder, url: &str) -> Result<Response, Error> {
        debug!(url, "sending request");
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::timeout(url)
            } else {
                Error::network(url, e)
            }
        })?;

        let status = response.status();
        debug!(url, status = status.as_u16(), "response received");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::status(url, status.as_u16(), body));
        }

        Ok(response)
    }

    /// Defensive check that the status bootstrap has happened.
    ///
    /// Unreachable through [`connect`](Self::connect), which either caches a
    /// status or fails; this guards hand-rolled construction paths.
    fn ensure_ready(&self) -> Result<(), Error> {
        match self.status.read() {
            Ok(guard) if guard.is_some() => Ok(()),
            _ => Err(Error::StatusUnavailable),
        }
    }

    fn store_status(&self, status: ServerStatus) {
        if let Ok(mut guard) = self.status.write() {
            *guard = Some(status);
        }
    }

    fn endpoint_url(&self, path: &str) -> Result<Url, Error> {
        self.base_url
            .join(path)
            .map_err(|_| Error::invalid_base_url(self.base_url.as_str()))
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, Error> {
    let parsed = Url::parse(base_url).map_err(|_| Error::invalid_base_url(base_url))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::invalid_base_url(base_url));
    }
    Ok(parsed)
}

fn build_client(
    base_url: &Url,
    connect_timeout_secs: u64,
    request_timeout_secs: u64,
) -> Result<Client, Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    if let Ok(referer) = HeaderValue::from_str(base_url.as_str()) {
        headers.insert(REFERER, referer);
    }

    Client::builder()
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .timeout(Duration::from_secs(request_timeout_secs))
        .gzip(true)
        .user_agent(user_agent::default_user_agent())
        .default_headers(headers)
        .build()
        .map_err(|e| Error::network(base_url.as_str(), e))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use crate::test_support::logging::capture_subscriber;
    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_status(server: &MockServer, version: &str) {
        Mock::given(method("GET"))
            .and(path("/api/v1/info/status"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "version": version, "status": "UP" })),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_connect_bootstraps_server_status() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        mount_status(&mock_server, "1.3.2").await;

        let transport = Transport::connect(&mock_server.uri()).await.unwrap();

        assert_eq!(transport.server_version(), "1.3.2");
        let status = transport.server_status().unwrap();
        assert_eq!(status.status, "UP");
    }

    #[tokio::test]
    async fn test_connect_sends_fixed_headers() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        // Base URL parsing normalizes the referer to a trailing slash
        let referer = format!("{}/", mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/api/v1/info/status"))
            .and(header("accept", "*/*"))
            .and(header("referer", referer.as_str()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "version": "1.0.0", "status": "UP" })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = Transport::connect(&mock_server.uri()).await;
        assert!(result.is_ok(), "Expected Ok, got: {result:?}");
    }

    #[tokio::test]
    async fn test_connect_fails_when_bootstrap_fails() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .and(path("/api/v1/info/status"))
            .respond_with(ResponseTemplate::new(503).set_body_string("starting up"))
            .mount(&mock_server)
            .await;

        let result = Transport::connect(&mock_server.uri()).await;
        match result {
            Err(Error::Status { status, reason, body, .. }) => {
                assert_eq!(status, 503);
                assert_eq!(reason, "Service unavailable");
                assert_eq!(body, "starting up");
            }
            other => panic!("Expected Status error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connect_fails_on_non_status_body() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .and(path("/api/v1/info/status"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let result = Transport::connect(&mock_server.uri()).await;
        assert!(matches!(result, Err(Error::Decode { .. })), "got: {result:?}");
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_base_url() {
        let result = Transport::connect("not a url").await;
        assert!(matches!(result, Err(Error::InvalidBaseUrl { .. })));

        let result = Transport::connect("ftp://example.com").await;
        assert!(matches!(result, Err(Error::InvalidBaseUrl { .. })));
    }

    #[tokio::test]
    async fn test_connect_times_out_on_slow_bootstrap() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .and(path("/api/v1/info/status"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "version": "1.0.0", "status": "UP" }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let result = Transport::connect_with_timeouts(&mock_server.uri(), 30, 1).await;
        assert!(
            matches!(result, Err(Error::Timeout { .. }) | Err(Error::Network { .. })),
            "expected timeout or network error, got: {result:?}"
        );
    }

    #[tokio::test]
    async fn test_require_version_gates_on_cached_version() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        mount_status(&mock_server, "1.2.0").await;

        let transport = Transport::connect(&mock_server.uri()).await.unwrap();

        match transport.require_version("1.3.2") {
            Err(Error::UnsupportedVersion { required, actual }) => {
                assert_eq!(required, "1.3.2");
                assert_eq!(actual, "1.2.0");
            }
            other => panic!("Expected UnsupportedVersion, got: {other:?}"),
        }

        assert!(transport.require_version("1.2.0").is_ok());
        assert!(transport.require_version("1.1.9").is_ok());
    }

    #[tokio::test]
    async fn test_gated_refusal_performs_no_network_calls() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        mount_status(&mock_server, "1.2.0").await;

        Mock::given(method("GET"))
            .and(path("/api/v1/info/load"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(7)))
            .expect(0)
            .mount(&mock_server)
            .await;

        let transport = Transport::connect(&mock_server.uri()).await.unwrap();
        let result = transport
            .gated("1.3.2", transport.get_json::<u64>("/api/v1/info/load", &[]))
            .await;

        assert!(matches!(result, Err(Error::UnsupportedVersion { .. })));
    }

    #[tokio::test]
    async fn test_gated_passes_through_at_minimum_version() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        mount_status(&mock_server, "1.3.2").await;

        Mock::given(method("GET"))
            .and(path("/api/v1/info/load"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(7)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = Transport::connect(&mock_server.uri()).await.unwrap();
        let count = transport
            .gated("1.3.2", transport.get_json::<u64>("/api/v1/info/load", &[]))
            .await
            .unwrap();

        assert_eq!(count, 7);
    }

    #[tokio::test]
    async fn test_fetch_status_refreshes_cached_version() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        // First answer advertises an old server, later answers a new one
        Mock::given(method("GET"))
            .and(path("/api/v1/info/status"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "version": "1.2.0", "status": "UP" })),
            )
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/info/status"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "version": "1.4.0", "status": "UP" })),
            )
            .mount(&mock_server)
            .await;

        let transport = Transport::connect(&mock_server.uri()).await.unwrap();
        assert_eq!(transport.server_version(), "1.2.0");
        assert!(transport.require_version("1.3.2").is_err());

        let refreshed = transport.fetch_status().await.unwrap();
        assert_eq!(refreshed.version, "1.4.0");
        assert_eq!(transport.server_version(), "1.4.0");
        assert!(transport.require_version("1.3.2").is_ok());
    }

    #[tokio::test]
    async fn test_get_forwards_query_parameters() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        mount_status(&mock_server, "1.3.2").await;

        Mock::given(method("GET"))
            .and(path("/api/v1/info/load"))
            .and(query_param("endpoint", "/api/v1/misc/compress-pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(3)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let transport = Transport::connect(&mock_server.uri()).await.unwrap();
        let count: u64 = transport
            .get_json(
                "/api/v1/info/load",
                &[("endpoint", "/api/v1/misc/compress-pdf")],
            )
            .await
            .unwrap();

        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn test_dispatch_maps_status_reasons_and_keeps_body() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        mount_status(&mock_server, "1.3.2").await;

        Mock::given(method("GET"))
            .and(path("/api/v1/info/uptime"))
            .respond_with(ResponseTemplate::new(422).set_body_string("bad field"))
            .mount(&mock_server)
            .await;

        let transport = Transport::connect(&mock_server.uri()).await.unwrap();
        let result = transport.get_text("/api/v1/info/uptime").await;

        match result {
            Err(Error::Status { status, reason, body, .. }) => {
                assert_eq!(status, 422);
                assert_eq!(reason, "Unprocessable entity");
                assert_eq!(body, "bad field");
            }
            other => panic!("Expected Status error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_requests_refused_before_bootstrap() {
        // Hand-rolled transport with an empty cache must refuse to dispatch
        let transport = Transport {
            http: Client::new(),
            base_url: Url::parse("http://localhost:9").unwrap(),
            status: RwLock::new(None),
        };

        let result = transport.get("/api/v1/info/uptime", &[]).await;
        assert!(matches!(result, Err(Error::StatusUnavailable)));
    }

    #[test]
    fn test_require_version_refusal_logs_both_versions() {
        let (events, subscriber) = capture_subscriber();
        let transport = Transport {
            http: Client::new(),
            base_url: Url::parse("http://localhost:9").unwrap(),
            status: RwLock::new(Some(ServerStatus {
                version: "1.2.0".to_string(),
                status: "UP".to_string(),
            })),
        };

        tracing::subscriber::with_default(subscriber, || {
            // Parallel tests may have cached Interest::Never for this callsite
            tracing::callsite::rebuild_interest_cache();
            assert!(transport.require_version("1.3.2").is_err());
        });

        let events = events.lock().unwrap();
        let Some(refusal) = events.iter().find(|event| {
            event
                .fields
                .get("message")
                .is_some_and(|message| message.contains("capability gate"))
        }) else {
            panic!("refusal warning not captured, events: {events:?}");
        };
        assert_eq!(
            refusal.fields.get("required").map(String::as_str),
            Some("1.3.2")
        );
        assert_eq!(
            refusal.fields.get("actual").map(String::as_str),
            Some("1.2.0")
        );
    }
}

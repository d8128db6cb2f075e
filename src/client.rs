//! Client facade wiring the operation modules to one shared transport.

use std::sync::Arc;

use url::Url;

use crate::api::convert::ConvertApi;
use crate::api::filter::FilterApi;
use crate::api::general::GeneralApi;
use crate::api::info::InfoApi;
use crate::api::misc::MiscApi;
use crate::api::security::SecurityApi;
use crate::error::Error;
use crate::transport::{ServerStatus, Transport};

/// Client for one Stirling PDF server.
///
/// Connecting performs a status bootstrap, so a constructed client always
/// knows the server's version and can gate version-sensitive calls. All
/// operation modules share one transport.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// use stirling_pdf_client::StirlingClient;
/// use stirling_pdf_client::api::FileInput;
/// use stirling_pdf_client::api::convert::WordFormat;
///
/// # async fn example() -> Result<(), stirling_pdf_client::Error> {
/// let client = StirlingClient::connect("http://localhost:8080").await?;
/// let saved = client
///     .convert()
///     .pdf_to_word(
///         &FileInput::path("report.pdf"),
///         WordFormat::Docx,
///         Path::new("out/"),
///     )
///     .await?;
/// println!("saved to {}", saved.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StirlingClient {
    transport: Arc<Transport>,
    convert: ConvertApi,
    security: SecurityApi,
    misc: MiscApi,
    general: GeneralApi,
    filter: FilterApi,
    info: InfoApi,
}

impl StirlingClient {
    /// Connects to a server and caches its advertised status.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBaseUrl`] for a malformed base URL and
    /// propagates any failure of the bootstrap status request.
    pub async fn connect(base_url: &str) -> Result<Self, Error> {
        let transport = Transport::connect(base_url).await?;
        Ok(Self::from_transport(Arc::new(transport)))
    }

    /// Connects with explicit timeout values.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`connect`](Self::connect).
    pub async fn connect_with_timeouts(
        base_url: &str,
        connect_timeout_secs: u64,
        request_timeout_secs: u64,
    ) -> Result<Self, Error> {
        let transport =
            Transport::connect_with_timeouts(base_url, connect_timeout_secs, request_timeout_secs)
                .await?;
        Ok(Self::from_transport(Arc::new(transport)))
    }

    fn from_transport(transport: Arc<Transport>) -> Self {
        Self {
            convert: ConvertApi::new(Arc::clone(&transport)),
            security: SecurityApi::new(Arc::clone(&transport)),
            misc: MiscApi::new(Arc::clone(&transport)),
            general: GeneralApi::new(Arc::clone(&transport)),
            filter: FilterApi::new(Arc::clone(&transport)),
            info: InfoApi::new(Arc::clone(&transport)),
            transport,
        }
    }

    /// Format conversion operations.
    #[must_use]
    pub fn convert(&self) -> &ConvertApi {
        &self.convert
    }

    /// Document security operations.
    #[must_use]
    pub fn security(&self) -> &SecurityApi {
        &self.security
    }

    /// Page-content tooling.
    #[must_use]
    pub fn misc(&self) -> &MiscApi {
        &self.misc
    }

    /// Document splitting operations.
    #[must_use]
    pub fn general(&self) -> &GeneralApi {
        &self.general
    }

    /// Server-side document filters.
    #[must_use]
    pub fn filter(&self) -> &FilterApi {
        &self.filter
    }

    /// Read-only server information.
    #[must_use]
    pub fn info(&self) -> &InfoApi {
        &self.info
    }

    /// Snapshot of the cached server status.
    #[must_use]
    pub fn server_status(&self) -> Option<ServerStatus> {
        self.transport.server_status()
    }

    /// Cached server version, `"0.0.0"` when none is cached.
    #[must_use]
    pub fn server_version(&self) -> String {
        self.transport.server_version()
    }

    /// Base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.transport.base_url()
    }

    /// The shared transport, for version checks outside the typed surface.
    #[must_use]
    pub fn transport(&self) -> &Transport {
        &self.transport
    }
}

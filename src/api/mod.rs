//! Typed operation groups for the Stirling PDF API.
//!
//! Each submodule owns one family of endpoints and is reachable through an
//! accessor on [`StirlingClient`](crate::client::StirlingClient):
//!
//! - [`convert`]: format conversions to and from PDF
//! - [`security`]: passwords, watermarks, signatures, redaction
//! - [`misc`]: page-content tooling (OCR, compression, stamps, metadata)
//! - [`general`]: document splitting
//! - [`filter`]: server-side document filters
//! - [`info`]: status, uptime and endpoint load counters
//!
//! Operations that send a document take a [`FileInput`], which carries a
//! local file, a server-side file id, or both.

use std::fmt;
use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};

use crate::error::Error;
use crate::save::save_response;
use crate::transport::Transport;

pub mod convert;
pub mod filter;
pub mod general;
pub mod info;
pub mod misc;
pub mod security;

/// Multipart field name the server reads uploaded documents from.
const FILE_FIELD: &str = "fileInput";

/// Fallback part filename for paths without a final component.
const FALLBACK_PART_NAME: &str = "file";

/// Document reference accepted by file-processing operations.
///
/// The server accepts a freshly uploaded file, the id of a file it already
/// holds, or both at once. An input carrying neither is rejected locally
/// before any network traffic.
///
/// # Example
///
/// ```
/// use stirling_pdf_client::api::FileInput;
///
/// let upload = FileInput::path("report.pdf");
/// let stored = FileInput::id("f81d4fae-7dec");
/// let both = FileInput::path("report.pdf").with_id("f81d4fae-7dec");
/// # let _ = (upload, stored, both);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInput {
    path: Option<PathBuf>,
    file_id: Option<String>,
}

impl FileInput {
    /// Input backed by a local file to upload.
    #[must_use]
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            file_id: None,
        }
    }

    /// Input referring to a file the server already holds.
    #[must_use]
    pub fn id(file_id: impl Into<String>) -> Self {
        Self {
            path: None,
            file_id: Some(file_id.into()),
        }
    }

    /// Adds a server-side file id to this input.
    #[must_use]
    pub fn with_id(mut self, file_id: impl Into<String>) -> Self {
        self.file_id = Some(file_id.into());
        self
    }

    /// Rejects inputs that carry neither a path nor a file id.
    pub(crate) fn ensure_provided(&self, operation: &'static str) -> Result<(), Error> {
        if self.path.is_none() && self.file_id.is_none() {
            return Err(Error::missing_input(operation));
        }
        Ok(())
    }

    /// Adds this input's parts to a multipart form.
    ///
    /// A local file is read fully into memory and attached under the
    /// server's upload field; the handle is closed before the request is
    /// sent. A file id is attached as a plain text field.
    pub(crate) async fn attach(&self, mut form: Form) -> Result<Form, Error> {
        if let Some(path) = &self.path {
            form = form.part(FILE_FIELD, file_part(path).await?);
        }
        if let Some(file_id) = &self.file_id {
            form = form.text("fileId", file_id.clone());
        }
        Ok(form)
    }
}

/// Builds a multipart part from a file on disk.
async fn file_part(path: &Path) -> Result<Part, Error> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Error::io(path, e))?;
    Ok(Part::bytes(bytes).file_name(part_file_name(path)))
}

/// Attaches several local files under one repeated field name.
async fn attach_files(
    mut form: Form,
    field: &'static str,
    paths: &[PathBuf],
) -> Result<Form, Error> {
    for path in paths {
        form = form.part(field, file_part(path).await?);
    }
    Ok(form)
}

/// Part filename derived from the final path component.
fn part_file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(
            || FALLBACK_PART_NAME.to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
}

/// Adds a text field when the value is present.
fn opt_text<T: ToString>(form: Form, name: &'static str, value: Option<T>) -> Form {
    match value {
        Some(value) => form.text(name, value.to_string()),
        None => form,
    }
}

/// Posts a multipart form and materializes the binary response.
async fn post_and_save(
    transport: &Transport,
    path: &str,
    form: Form,
    target: &Path,
) -> Result<PathBuf, Error> {
    let response = transport.post_multipart(path, form).await?;
    save_response(response, target).await
}

/// Character set a stamp or watermark text is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alphabet {
    Roman,
    Arabic,
    Japanese,
    Chinese,
    Korean,
}

impl Alphabet {
    /// Wire value of this alphabet.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Roman => "roman",
            Self::Arabic => "arabic",
            Self::Japanese => "japanese",
            Self::Chinese => "chinese",
            Self::Korean => "korean",
        }
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::Roman
    }
}

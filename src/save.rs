//! Response-to-file materialization.
//!
//! Binary endpoints answer with the produced document in the response body.
//! The caller supplies an output target that is either an exact file path or
//! a directory; a directory target is resolved using the filename the
//! response advertises. Bytes are streamed to disk unchanged.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};

use crate::error::Error;
use crate::filename::{DEFAULT_FILENAME, response_filename};

/// Saves a response body to the output target, returning the resolved path.
///
/// A target that names an existing regular file is overwritten in place; any
/// other target is treated as a directory and joined with the filename
/// derived from the response headers (falling back to [`DEFAULT_FILENAME`]).
/// Parent directories are not created.
///
/// The status class is checked before any file is created, so error bodies
/// are never persisted as artifacts; a body stream that fails midway removes
/// the partial file before the error is returned.
///
/// # Errors
///
/// Returns [`Error::Status`] for a non-2xx response, [`Error::Io`] when the
/// file cannot be created or written, and [`Error::Network`] when reading
/// the body stream fails.
#[instrument(skip(response, target), fields(url = %response.url()))]
pub async fn save_response(response: reqwest::Response, target: &Path) -> Result<PathBuf, Error> {
    let url = response.url().to_string();

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::status(url, status, body));
    }

    let file_path = resolve_target(&response, target).await;
    debug!(path = %file_path.display(), "resolved output path");

    let mut file = File::create(&file_path)
        .await
        .map_err(|e| Error::io(file_path.clone(), e))?;

    // Stream response body to file, with cleanup on error
    let stream_result = stream_to_file(&mut file, response, &url, &file_path).await;
    if stream_result.is_err() {
        debug!(path = %file_path.display(), "cleaning up partial file after error");
        let _ = tokio::fs::remove_file(&file_path).await;
    }
    let bytes_written = stream_result?;

    info!(path = %file_path.display(), bytes = bytes_written, "response saved");
    Ok(file_path)
}

/// Resolves the final output path for a response.
///
/// An existing regular file is used as-is; everything else is treated as a
/// directory to place the response-derived filename in.
async fn resolve_target(response: &reqwest::Response, target: &Path) -> PathBuf {
    let is_file = tokio::fs::metadata(target)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false);
    if is_file {
        return target.to_path_buf();
    }

    let filename = response_filename(response.headers(), DEFAULT_FILENAME);
    target.join(filename)
}

/// Streams response body to file, returning bytes written.
///
/// Extracted so the caller can clean up the partial file on error.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
) -> Result<u64, Error> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| Error::network(url, e))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| Error::io(file_path.to_path_buf(), e))?;

        bytes_written += chunk.len() as u64;
    }

    // Ensure all data is flushed to disk
    writer
        .flush()
        .await
        .map_err(|e| Error::io(file_path.to_path_buf(), e))?;

    Ok(bytes_written)
}

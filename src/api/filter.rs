//! Server-side document filters.
//!
//! These endpoints predate the versioned API and still live under the
//! legacy `/api/filter` base path.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::multipart::Form;

use super::{FileInput, post_and_save};
use crate::error::Error;
use crate::transport::Transport;

/// Comparison applied between the document's pages and the standard size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeComparator {
    Greater,
    Equal,
    Less,
}

impl SizeComparator {
    /// Wire value of this comparison.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greater => "Greater",
            Self::Equal => "Equal",
            Self::Less => "Less",
        }
    }
}

impl fmt::Display for SizeComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Standard page size the filter compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
    Letter,
    Legal,
}

impl PageSize {
    /// Wire value of this page size.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A0 => "A0",
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::A3 => "A3",
            Self::A4 => "A4",
            Self::A5 => "A5",
            Self::A6 => "A6",
            Self::Letter => "LETTER",
            Self::Legal => "LEGAL",
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Server-side document filters (legacy `/api/filter`).
#[derive(Debug, Clone)]
pub struct FilterApi {
    transport: Arc<Transport>,
}

impl FilterApi {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Returns the document when its page size matches the comparison.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn page_size(
        &self,
        file: &FileInput,
        comparator: SizeComparator,
        standard_page_size: PageSize,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided("filter-page-size")?;
        let form = file
            .attach(Form::new())
            .await?
            .text("comparator", comparator.as_str())
            .text("standardPageSize", standard_page_size.as_str());
        post_and_save(&self.transport, "/api/filter/pageSize", form, target).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparator_wire_values_are_capitalized() {
        assert_eq!(SizeComparator::Greater.as_str(), "Greater");
        assert_eq!(SizeComparator::Equal.as_str(), "Equal");
        assert_eq!(SizeComparator::Less.as_str(), "Less");
    }

    #[test]
    fn test_page_size_wire_values() {
        assert_eq!(PageSize::A4.as_str(), "A4");
        assert_eq!(PageSize::Letter.as_str(), "LETTER");
        assert_eq!(PageSize::Legal.as_str(), "LEGAL");
    }
}

//! Document splitting operations (`/api/v1/general`).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::multipart::Form;

use super::{FileInput, post_and_save};
use crate::error::Error;
use crate::transport::Transport;

/// Grid layout for section-based splitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitBySectionsOptions {
    /// Number of horizontal cuts per page.
    pub horizontal_divisions: u32,
    /// Number of vertical cuts per page.
    pub vertical_divisions: u32,
    /// Merge the sections back into one document.
    pub merge: bool,
}

impl Default for SplitBySectionsOptions {
    fn default() -> Self {
        Self {
            horizontal_divisions: 0,
            vertical_divisions: 1,
            merge: true,
        }
    }
}

/// Bookmark handling for chapter-based splitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitByChaptersOptions {
    /// Copy document metadata into each part.
    pub include_metadata: bool,
    /// Keep chapters that share a start page.
    pub allow_duplicates: bool,
    /// Outline depth treated as a chapter boundary.
    pub bookmark_level: u32,
}

impl Default for SplitByChaptersOptions {
    fn default() -> Self {
        Self {
            include_metadata: true,
            allow_duplicates: true,
            bookmark_level: 2,
        }
    }
}

/// Document splitting operations (`/api/v1/general`).
#[derive(Debug, Clone)]
pub struct GeneralApi {
    transport: Arc<Transport>,
}

impl GeneralApi {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Cuts each page into a grid of sections.
    ///
    /// The result arrives as a ZIP archive unless merging is enabled.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn split_by_sections(
        &self,
        file: &FileInput,
        options: &SplitBySectionsOptions,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided("split-pdf-by-sections")?;
        let form = file
            .attach(Form::new())
            .await?
            .text("horizontalDivisions", options.horizontal_divisions.to_string())
            .text("verticalDivisions", options.vertical_divisions.to_string())
            .text("merge", options.merge.to_string());
        post_and_save(&self.transport, "/api/v1/general/split-pdf-by-sections", form, target).await
    }

    /// Splits the document at its outline chapters.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn split_by_chapters(
        &self,
        file: &FileInput,
        options: &SplitByChaptersOptions,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided("split-pdf-by-chapters")?;
        let form = file
            .attach(Form::new())
            .await?
            .text("includeMetadata", options.include_metadata.to_string())
            .text("allowDuplicates", options.allow_duplicates.to_string())
            .text("bookmarkLevel", options.bookmark_level.to_string());
        post_and_save(&self.transport, "/api/v1/general/split-pdf-by-chapters", form, target).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_by_sections_defaults() {
        let options = SplitBySectionsOptions::default();
        assert_eq!(options.horizontal_divisions, 0);
        assert_eq!(options.vertical_divisions, 1);
        assert!(options.merge);
    }

    #[test]
    fn test_split_by_chapters_defaults() {
        let options = SplitByChaptersOptions::default();
        assert!(options.include_metadata);
        assert!(options.allow_duplicates);
        assert_eq!(options.bookmark_level, 2);
    }
}

//! Format conversions to and from PDF (`/api/v1/convert`).

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::multipart::Form;

use super::{FILE_FIELD, FileInput, attach_files, file_part, post_and_save};
use crate::error::Error;
use crate::transport::Transport;

/// Output format for word-processor conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordFormat {
    Doc,
    Docx,
}

impl WordFormat {
    /// Wire value of this format.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Doc => "doc",
            Self::Docx => "docx",
        }
    }
}

impl fmt::Display for WordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output format for plain-text conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Rtf,
    Txt,
}

impl TextFormat {
    /// Wire value of this format.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rtf => "rtf",
            Self::Txt => "txt",
        }
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output format for presentation conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationFormat {
    Ppt,
    Pptx,
}

impl PresentationFormat {
    /// Wire value of this format.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ppt => "ppt",
            Self::Pptx => "pptx",
        }
    }
}

impl fmt::Display for PresentationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Target archival profile for PDF/A conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfaFormat {
    Pdfa,
    Pdfa1,
}

impl PdfaFormat {
    /// Wire value of this profile.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdfa => "pdfa",
            Self::Pdfa1 => "pdfa-1",
        }
    }
}

impl fmt::Display for PdfaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raster format for page rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpg,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    /// Wire value of this format.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether rendered pages land in one image or one image per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLayout {
    Single,
    Multiple,
}

impl PageLayout {
    /// Wire value of this layout.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multiple => "multiple",
        }
    }
}

impl fmt::Display for PageLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Color treatment applied to rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorType {
    Color,
    Greyscale,
    BlackWhite,
}

impl ColorType {
    /// Wire value of this color treatment.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Greyscale => "greyscale",
            Self::BlackWhite => "blackwhite",
        }
    }
}

impl fmt::Display for ColorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How images are fitted onto PDF pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitOption {
    FillPage,
    FitDocumentToImage,
    MaintainAspectRatio,
}

impl FitOption {
    /// Wire value of this fit mode.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FillPage => "fillPage",
            Self::FitDocumentToImage => "fitDocumentToImage",
            Self::MaintainAspectRatio => "maintainAspectRatio",
        }
    }
}

impl fmt::Display for FitOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Options for rendering PDF pages as images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfToImageOptions {
    /// Pages to render, `"all"` or a page selection expression.
    pub page_numbers: String,
    /// Raster format, `png` by default.
    pub image_format: ImageFormat,
    /// One combined image or one image per page.
    pub layout: PageLayout,
    /// Color treatment.
    pub color_type: ColorType,
    /// Render resolution in dots per inch.
    pub dpi: u32,
    /// Render annotations into the output.
    pub include_annotations: bool,
}

impl Default for PdfToImageOptions {
    fn default() -> Self {
        Self {
            page_numbers: "all".to_string(),
            image_format: ImageFormat::Png,
            layout: PageLayout::Multiple,
            color_type: ColorType::Color,
            dpi: 300,
            include_annotations: false,
        }
    }
}

/// Options for combining images into a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageToPdfOptions {
    /// How each image is fitted onto its page.
    pub fit_option: FitOption,
    /// Color treatment.
    pub color_type: ColorType,
    /// Rotate images to match page orientation.
    pub auto_rotate: bool,
}

impl Default for ImageToPdfOptions {
    fn default() -> Self {
        Self {
            fit_option: FitOption::FillPage,
            color_type: ColorType::Color,
            auto_rotate: false,
        }
    }
}

/// Options for rendering an email file as a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmlToPdfOptions {
    /// Embed the mail's attachments into the PDF.
    pub include_attachments: bool,
    /// Attachment size cap in megabytes.
    pub max_attachment_size_mb: u32,
    /// Render the HTML body instead of the plain-text body.
    pub download_html: bool,
    /// List every recipient in the rendered header.
    pub include_all_recipients: bool,
}

impl Default for EmlToPdfOptions {
    fn default() -> Self {
        Self {
            include_attachments: false,
            max_attachment_size_mb: 10,
            download_html: false,
            include_all_recipients: true,
        }
    }
}

/// Format conversion operations (`/api/v1/convert`).
#[derive(Debug, Clone)]
pub struct ConvertApi {
    transport: Arc<Transport>,
}

impl ConvertApi {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Renders a web page as a PDF.
    ///
    /// The only operation in this family without a file payload; the URL is
    /// posted as a urlencoded field.
    ///
    /// # Errors
    ///
    /// Fails when the request is refused or the result cannot be written to
    /// `target`.
    pub async fn url_to_pdf(&self, url: &str, target: &Path) -> Result<PathBuf, Error> {
        let response = self
            .transport
            .post_form("/api/v1/convert/url/pdf", &[("urlInput", url)])
            .await?;
        crate::save::save_response(response, target).await
    }

    /// Extracts a PDF's structure as XML-derived JSON.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the body
    /// is not JSON.
    pub async fn pdf_to_xml(&self, file: &FileInput) -> Result<serde_json::Value, Error> {
        file.ensure_provided("pdf-to-xml")?;
        let form = file.attach(Form::new()).await?;
        let response = self
            .transport
            .post_multipart("/api/v1/convert/pdf/xml", form)
            .await?;
        let url = response.url().to_string();
        response.json().await.map_err(|e| Error::decode(url, e))
    }

    /// Converts a PDF into a Word document.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn pdf_to_word(
        &self,
        file: &FileInput,
        format: WordFormat,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        self.convert_with_format(
            "/api/v1/convert/pdf/word",
            "pdf-to-word",
            file,
            format.as_str(),
            target,
        )
        .await
    }

    /// Converts a PDF into plain text or RTF.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn pdf_to_text(
        &self,
        file: &FileInput,
        format: TextFormat,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        self.convert_with_format(
            "/api/v1/convert/pdf/text",
            "pdf-to-text",
            file,
            format.as_str(),
            target,
        )
        .await
    }

    /// Converts a PDF into a slide deck.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn pdf_to_presentation(
        &self,
        file: &FileInput,
        format: PresentationFormat,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        self.convert_with_format(
            "/api/v1/convert/pdf/presentation",
            "pdf-to-presentation",
            file,
            format.as_str(),
            target,
        )
        .await
    }

    /// Re-encodes a PDF under an archival PDF/A profile.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn pdf_to_pdfa(
        &self,
        file: &FileInput,
        format: PdfaFormat,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        self.convert_with_format(
            "/api/v1/convert/pdf/pdfa",
            "pdf-to-pdfa",
            file,
            format.as_str(),
            target,
        )
        .await
    }

    /// Converts a PDF into Markdown.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn pdf_to_markdown(&self, file: &FileInput, target: &Path) -> Result<PathBuf, Error> {
        self.convert_plain("/api/v1/convert/pdf/markdown", "pdf-to-markdown", file, target)
            .await
    }

    /// Renders PDF pages as images.
    ///
    /// Multi-page renders arrive as a ZIP archive.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn pdf_to_image(
        &self,
        file: &FileInput,
        options: &PdfToImageOptions,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided("pdf-to-image")?;
        let form = file
            .attach(Form::new())
            .await?
            .text("pageNumbers", options.page_numbers.clone())
            .text("imageFormat", options.image_format.as_str())
            .text("singleOrMultiple", options.layout.as_str())
            .text("colorType", options.color_type.as_str())
            .text("dpi", options.dpi.to_string())
            .text("includeAnnotations", options.include_annotations.to_string());
        post_and_save(&self.transport, "/api/v1/convert/pdf/img", form, target).await
    }

    /// Converts a PDF into HTML.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn pdf_to_html(&self, file: &FileInput, target: &Path) -> Result<PathBuf, Error> {
        self.convert_plain("/api/v1/convert/pdf/html", "pdf-to-html", file, target)
            .await
    }

    /// Extracts tabular data from a PDF as CSV.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn pdf_to_csv(
        &self,
        file: &FileInput,
        page_numbers: &str,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided("pdf-to-csv")?;
        let form = file
            .attach(Form::new())
            .await?
            .text("pageNumbers", page_numbers.to_string());
        post_and_save(&self.transport, "/api/v1/convert/pdf/csv", form, target).await
    }

    /// Converts a local Markdown file into a PDF.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn markdown_to_pdf(&self, file: &Path, target: &Path) -> Result<PathBuf, Error> {
        self.convert_local_file("/api/v1/convert/markdown/pdf", file, target)
            .await
    }

    /// Combines local image files into one PDF.
    ///
    /// # Errors
    ///
    /// Fails when any image cannot be read, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn images_to_pdf(
        &self,
        images: &[PathBuf],
        options: &ImageToPdfOptions,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        let form = attach_files(Form::new(), FILE_FIELD, images)
            .await?
            .text("fitOption", options.fit_option.as_str())
            .text("colorType", options.color_type.as_str())
            .text("autoRotate", options.auto_rotate.to_string());
        post_and_save(&self.transport, "/api/v1/convert/img/pdf", form, target).await
    }

    /// Renders an HTML file as a PDF at the given zoom level.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn html_to_pdf(
        &self,
        file: &FileInput,
        zoom: f64,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided("html-to-pdf")?;
        let form = file.attach(Form::new()).await?.text("zoom", zoom.to_string());
        post_and_save(&self.transport, "/api/v1/convert/html/pdf", form, target).await
    }

    /// Converts a local office document into a PDF.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn file_to_pdf(&self, file: &Path, target: &Path) -> Result<PathBuf, Error> {
        self.convert_local_file("/api/v1/convert/file/pdf", file, target)
            .await
    }

    /// Renders an EML email file as a PDF.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn eml_to_pdf(
        &self,
        file: &FileInput,
        options: &EmlToPdfOptions,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided("eml-to-pdf")?;
        let form = file
            .attach(Form::new())
            .await?
            .text("includeAttachments", options.include_attachments.to_string())
            .text("maxAttachmentSizeMB", options.max_attachment_size_mb.to_string())
            .text("downloadHtml", options.download_html.to_string())
            .text("includeAllRecipients", options.include_all_recipients.to_string());
        post_and_save(&self.transport, "/api/v1/convert/eml/pdf", form, target).await
    }

    async fn convert_with_format(
        &self,
        endpoint: &str,
        operation: &'static str,
        file: &FileInput,
        format: &'static str,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided(operation)?;
        let form = file.attach(Form::new()).await?.text("outputFormat", format);
        post_and_save(&self.transport, endpoint, form, target).await
    }

    async fn convert_plain(
        &self,
        endpoint: &str,
        operation: &'static str,
        file: &FileInput,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided(operation)?;
        let form = file.attach(Form::new()).await?;
        post_and_save(&self.transport, endpoint, form, target).await
    }

    async fn convert_local_file(
        &self,
        endpoint: &str,
        file: &Path,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        let form = Form::new().part(FILE_FIELD, file_part(file).await?);
        post_and_save(&self.transport, endpoint, form, target).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_wire_values() {
        assert_eq!(WordFormat::Doc.as_str(), "doc");
        assert_eq!(WordFormat::Docx.as_str(), "docx");
        assert_eq!(TextFormat::Rtf.as_str(), "rtf");
        assert_eq!(PresentationFormat::Pptx.as_str(), "pptx");
        assert_eq!(PdfaFormat::Pdfa1.as_str(), "pdfa-1");
        assert_eq!(ImageFormat::Webp.as_str(), "webp");
        assert_eq!(PageLayout::Single.as_str(), "single");
        assert_eq!(ColorType::BlackWhite.as_str(), "blackwhite");
        assert_eq!(FitOption::MaintainAspectRatio.as_str(), "maintainAspectRatio");
        assert_eq!(FitOption::FillPage.to_string(), "fillPage");
    }

    #[test]
    fn test_pdf_to_image_defaults() {
        let options = PdfToImageOptions::default();
        assert_eq!(options.page_numbers, "all");
        assert_eq!(options.image_format, ImageFormat::Png);
        assert_eq!(options.layout, PageLayout::Multiple);
        assert_eq!(options.color_type, ColorType::Color);
        assert_eq!(options.dpi, 300);
        assert!(!options.include_annotations);
    }

    #[test]
    fn test_eml_defaults() {
        let options = EmlToPdfOptions::default();
        assert!(!options.include_attachments);
        assert_eq!(options.max_attachment_size_mb, 10);
        assert!(!options.download_html);
        assert!(options.include_all_recipients);
    }

    #[test]
    fn test_image_to_pdf_defaults() {
        let options = ImageToPdfOptions::default();
        assert_eq!(options.fit_option, FitOption::FillPage);
        assert_eq!(options.color_type, ColorType::Color);
        assert!(!options.auto_rotate);
    }
}

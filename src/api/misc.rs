//! Page-content tooling (`/api/v1/misc`): metadata, OCR, compression,
//! stamps, overlays and cleanup passes.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::multipart::Form;

use super::{Alphabet, FILE_FIELD, FileInput, attach_files, file_part, opt_text, post_and_save};
use crate::error::Error;
use crate::transport::Transport;

/// Metadata fields to write into a document.
///
/// Absent fields are left untouched; `all_request_params` carries arbitrary
/// extra metadata keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataUpdate {
    /// Drop every metadata field before applying the rest.
    pub delete_all: bool,
    pub author: Option<String>,
    pub creation_date: Option<String>,
    pub creator: Option<String>,
    pub keywords: Option<String>,
    pub modification_date: Option<String>,
    pub producer: Option<String>,
    pub subject: Option<String>,
    pub title: Option<String>,
    pub trapped: Option<bool>,
    /// Extra metadata entries, keyed by their raw names.
    pub all_request_params: BTreeMap<String, String>,
}

/// Output quality of the simulated scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanQuality {
    Low,
    Medium,
    High,
}

impl ScanQuality {
    /// Wire value of this quality level.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for ScanQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How crooked the simulated scan comes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanRotation {
    None,
    Slight,
    Moderate,
    Severe,
}

impl ScanRotation {
    /// Wire value of this rotation level.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Slight => "slight",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        }
    }
}

impl fmt::Display for ScanRotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Options for making a clean PDF look scanned.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannerEffectOptions {
    pub quality: ScanQuality,
    pub rotation: ScanRotation,
    /// Simulated page border in pixels.
    pub border: i32,
    /// Base rotation in degrees.
    pub rotate: i32,
    /// Random variance added to the base rotation.
    pub rotate_variance: i32,
    pub brightness: f64,
    pub contrast: f64,
    pub blur: f64,
    pub noise: f64,
    /// Tint pages toward aged paper.
    pub yellowish: bool,
    pub resolution: u32,
    /// Use the numeric quality/rotation values instead of the presets.
    pub advanced_enabled: bool,
    pub quality_value: i32,
    pub rotation_value: i32,
}

impl Default for ScannerEffectOptions {
    fn default() -> Self {
        Self {
            quality: ScanQuality::High,
            rotation: ScanRotation::None,
            border: 20,
            rotate: 0,
            rotate_variance: 0,
            brightness: 1.0,
            contrast: 1.0,
            blur: 1.0,
            noise: 8.0,
            yellowish: false,
            resolution: 300,
            advanced_enabled: false,
            quality_value: 0,
            rotation_value: 0,
        }
    }
}

/// Color replacement strategy for `replace_invert`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvertMode {
    HighContrastColor,
    CustomColor,
    FullInversion,
}

impl InvertMode {
    /// Wire value of this strategy.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighContrastColor => "HIGH_CONTRAST_COLOR",
            Self::CustomColor => "CUSTOM_COLOR",
            Self::FullInversion => "FULL_INVERSION",
        }
    }
}

impl fmt::Display for InvertMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Preset text/background pairing for high-contrast mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContrastCombination {
    WhiteTextOnBlack,
    BlackTextOnWhite,
    GreenTextOnBlack,
}

impl ContrastCombination {
    /// Wire value of this pairing.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WhiteTextOnBlack => "WHITE_TEXT_ON_BLACK",
            Self::BlackTextOnWhite => "BLACK_TEXT_ON_WHITE",
            Self::GreenTextOnBlack => "GREEN_TEXT_ON_BLACK",
        }
    }
}

impl fmt::Display for ContrastCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Options for recoloring or inverting document colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceInvertOptions {
    pub mode: InvertMode,
    /// Pairing used when `mode` is high-contrast.
    pub high_contrast_combination: ContrastCombination,
    /// Background color for custom-color mode, as a hex string.
    pub background_color: String,
    /// Text color for custom-color mode, as a hex string.
    pub text_color: String,
}

impl Default for ReplaceInvertOptions {
    fn default() -> Self {
        Self {
            mode: InvertMode::HighContrastColor,
            high_contrast_combination: ContrastCombination::WhiteTextOnBlack,
            background_color: "#FFFFFF".to_string(),
            text_color: "#000000".to_string(),
        }
    }
}

/// Detection thresholds for blank-page removal.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoveBlanksOptions {
    /// Pixel darkness threshold below which content counts as blank.
    pub threshold: u32,
    /// Percentage of white pixels required for a page to be dropped.
    pub white_percent: f64,
}

impl Default for RemoveBlanksOptions {
    fn default() -> Self {
        Self {
            threshold: 10,
            white_percent: 99.9,
        }
    }
}

/// How OCR treats pages that already carry a text layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrType {
    SkipText,
    ForceOcr,
    Normal,
}

impl OcrType {
    /// Wire value of this mode. The mixed casing is the server's.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SkipText => "skip-text",
            Self::ForceOcr => "force-ocr",
            Self::Normal => "Normal",
        }
    }
}

impl fmt::Display for OcrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How recognized text is embedded into the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrRenderType {
    Hocr,
    Sandwich,
}

impl OcrRenderType {
    /// Wire value of this render mode.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hocr => "hocr",
            Self::Sandwich => "sandwich",
        }
    }
}

impl fmt::Display for OcrRenderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Options for running OCR over a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrOptions {
    /// Tesseract language codes, sent as repeated fields.
    pub languages: Vec<String>,
    pub ocr_type: OcrType,
    pub render_type: OcrRenderType,
    /// Also produce a sidecar text file.
    pub sidecar: bool,
    pub deskew: bool,
    pub clean: bool,
    pub clean_final: bool,
    pub remove_images_after: bool,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            languages: vec!["eng".to_string()],
            ocr_type: OcrType::SkipText,
            render_type: OcrRenderType::Hocr,
            sidecar: true,
            deskew: true,
            clean: true,
            clean_final: true,
            remove_images_after: true,
        }
    }
}

/// Raster format for image extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractImageFormat {
    Png,
    Jpg,
    Jpeg,
    Gif,
}

impl ExtractImageFormat {
    /// Wire value of this format.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
        }
    }
}

impl fmt::Display for ExtractImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Detection tuning for photographed-scan extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageScanOptions {
    /// Maximum skew angle, in degrees, still counted as one scan.
    pub angle_threshold: u32,
    pub tolerance: u32,
    /// Minimum region area in pixels.
    pub min_area: u32,
    pub min_contour_area: u32,
    pub border_size: u32,
}

impl Default for ImageScanOptions {
    fn default() -> Self {
        Self {
            angle_threshold: 5,
            tolerance: 20,
            min_area: 8000,
            min_contour_area: 500,
            border_size: 1,
        }
    }
}

/// Options for shrinking a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressOptions {
    /// Optimization aggressiveness, 1 (light) to 9 (heavy).
    pub optimize_level: u32,
    /// Target output size in kilobytes.
    pub expected_output_size_kb: u64,
    /// Linearize the output for web viewing.
    pub linearize: bool,
    /// Normalize content streams.
    pub normalize: bool,
    /// Convert images to grayscale.
    pub grayscale: bool,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            optimize_level: 5,
            expected_output_size_kb: 25,
            linearize: false,
            normalize: false,
            grayscale: false,
        }
    }
}

/// Whether a stamp is rendered from text or an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampType {
    Text,
    Image,
}

impl StampType {
    /// Wire value of this stamp kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for StampType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Nine-cell page position, sent on the wire as its numpad-style digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampPosition {
    BottomLeft,
    BottomCenter,
    BottomRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    TopLeft,
    TopCenter,
    TopRight,
}

impl StampPosition {
    /// Wire code of this cell: `1` is bottom-left, `9` is top-right.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BottomLeft => "1",
            Self::BottomCenter => "2",
            Self::BottomRight => "3",
            Self::MiddleLeft => "4",
            Self::MiddleCenter => "5",
            Self::MiddleRight => "6",
            Self::TopLeft => "7",
            Self::TopCenter => "8",
            Self::TopRight => "9",
        }
    }
}

impl fmt::Display for StampPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Margin preset for stamp placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginSize {
    Small,
    Medium,
    Large,
    XLarge,
}

impl MarginSize {
    /// Wire value of this margin preset.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::XLarge => "x-large",
        }
    }
}

impl fmt::Display for MarginSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Options for stamping pages with text or an image.
#[derive(Debug, Clone, PartialEq)]
pub struct StampOptions {
    /// Pages to stamp, `"all"` or a page selection expression.
    pub page_numbers: String,
    pub stamp_type: StampType,
    /// Text to render for text stamps.
    pub stamp_text: Option<String>,
    /// Image file for image stamps, uploaded alongside the document.
    pub stamp_image: Option<PathBuf>,
    /// Character set the text is rendered with.
    pub alphabet: Alphabet,
    pub font_size: u32,
    pub rotation: i32,
    pub opacity: f64,
    /// Exact horizontal position; `-1` keeps the grid placement.
    pub override_x: f64,
    /// Exact vertical position; `-1` keeps the grid placement.
    pub override_y: f64,
    pub position: StampPosition,
    pub custom_margin: MarginSize,
    /// Stamp color as a hex string.
    pub custom_color: String,
}

impl Default for StampOptions {
    fn default() -> Self {
        Self {
            page_numbers: "all".to_string(),
            stamp_type: StampType::Text,
            stamp_text: None,
            stamp_image: None,
            alphabet: Alphabet::Roman,
            font_size: 30,
            rotation: 0,
            opacity: 0.5,
            override_x: -1.0,
            override_y: -1.0,
            position: StampPosition::MiddleCenter,
            custom_margin: MarginSize::Medium,
            custom_color: "#d3d3d3".to_string(),
        }
    }
}

/// Placement of an overlaid image.
#[derive(Debug, Clone, PartialEq)]
pub struct AddImageOptions {
    /// Pages to draw on, `"all"` or a page selection expression.
    pub page_numbers: String,
    pub x: f64,
    pub y: f64,
    /// Repeat the image on every page.
    pub every_page: bool,
}

impl Default for AddImageOptions {
    fn default() -> Self {
        Self {
            page_numbers: "all".to_string(),
            x: 0.0,
            y: 0.0,
            every_page: false,
        }
    }
}

/// Page-content tooling (`/api/v1/misc`).
#[derive(Debug, Clone)]
pub struct MiscApi {
    transport: Arc<Transport>,
}

impl MiscApi {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Rewrites document metadata.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn update_metadata(
        &self,
        file: &FileInput,
        update: &MetadataUpdate,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided("update-metadata")?;
        let mut form = file
            .attach(Form::new())
            .await?
            .text("deleteAll", update.delete_all.to_string());
        form = opt_text(form, "author", update.author.clone());
        form = opt_text(form, "creationDate", update.creation_date.clone());
        form = opt_text(form, "creator", update.creator.clone());
        form = opt_text(form, "keywords", update.keywords.clone());
        form = opt_text(form, "modificationDate", update.modification_date.clone());
        form = opt_text(form, "producer", update.producer.clone());
        form = opt_text(form, "subject", update.subject.clone());
        form = opt_text(form, "title", update.title.clone());
        form = opt_text(form, "trapped", update.trapped);
        for (key, value) in &update.all_request_params {
            form = form.text(format!("allRequestParams[{key}]"), value.clone());
        }
        post_and_save(&self.transport, "/api/v1/misc/update-metadata", form, target).await
    }

    /// Makes form fields editable again.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn unlock_pdf_forms(
        &self,
        file: &FileInput,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided("unlock-pdf-forms")?;
        let form = file.attach(Form::new()).await?;
        post_and_save(&self.transport, "/api/v1/misc/unlock-pdf-forms", form, target).await
    }

    /// Makes a clean local PDF look like a physical scan.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn scanner_effect(
        &self,
        file: &Path,
        options: &ScannerEffectOptions,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        let form = Form::new()
            .part(FILE_FIELD, file_part(file).await?)
            .text("quality", options.quality.as_str())
            .text("rotation", options.rotation.as_str())
            .text("border", options.border.to_string())
            .text("rotate", options.rotate.to_string())
            .text("rotateVariance", options.rotate_variance.to_string())
            .text("brightness", options.brightness.to_string())
            .text("contrast", options.contrast.to_string())
            .text("blur", options.blur.to_string())
            .text("noise", options.noise.to_string())
            .text("yellowish", options.yellowish.to_string())
            .text("resolution", options.resolution.to_string())
            .text("advancedEnabled", options.advanced_enabled.to_string())
            .text("qualityValue", options.quality_value.to_string())
            .text("rotationValue", options.rotation_value.to_string());
        post_and_save(&self.transport, "/api/v1/misc/scanner-effect", form, target).await
    }

    /// Recolors or inverts the document's colors.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn replace_invert(
        &self,
        file: &FileInput,
        options: &ReplaceInvertOptions,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided("replace-invert-pdf")?;
        let form = file
            .attach(Form::new())
            .await?
            .text("replaceAndInvertOption", options.mode.as_str())
            .text("highContrastColorCombination", options.high_contrast_combination.as_str())
            .text("backGroundColor", options.background_color.clone())
            .text("textColor", options.text_color.clone());
        post_and_save(&self.transport, "/api/v1/misc/replace-invert-pdf", form, target).await
    }

    /// Repairs a structurally damaged PDF.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn repair(&self, file: &FileInput, target: &Path) -> Result<PathBuf, Error> {
        file.ensure_provided("repair")?;
        let form = file.attach(Form::new()).await?;
        post_and_save(&self.transport, "/api/v1/misc/repair", form, target).await
    }

    /// Drops blank pages.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn remove_blanks(
        &self,
        file: &FileInput,
        options: &RemoveBlanksOptions,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided("remove-blanks")?;
        let form = file
            .attach(Form::new())
            .await?
            .text("threshold", options.threshold.to_string())
            .text("whitePercent", options.white_percent.to_string());
        post_and_save(&self.transport, "/api/v1/misc/remove-blanks", form, target).await
    }

    /// Runs OCR over the document.
    ///
    /// Language codes are sent as repeated fields; OCR jobs can run for a
    /// long time on large documents.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn ocr(
        &self,
        file: &FileInput,
        options: &OcrOptions,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided("ocr-pdf")?;
        let mut form = file.attach(Form::new()).await?;
        for language in &options.languages {
            form = form.text("languages", language.clone());
        }
        form = form
            .text("ocrType", options.ocr_type.as_str())
            .text("ocrRenderType", options.render_type.as_str())
            .text("sidecar", options.sidecar.to_string())
            .text("deskew", options.deskew.to_string())
            .text("clean", options.clean.to_string())
            .text("cleanFinal", options.clean_final.to_string())
            .text("removeImagesAfter", options.remove_images_after.to_string());
        post_and_save(&self.transport, "/api/v1/misc/ocr-pdf", form, target).await
    }

    /// Flattens interactive content into page content.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn flatten(
        &self,
        file: &FileInput,
        flatten_only_forms: bool,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided("flatten")?;
        let form = file
            .attach(Form::new())
            .await?
            .text("flattenOnlyForms", flatten_only_forms.to_string());
        post_and_save(&self.transport, "/api/v1/misc/flatten", form, target).await
    }

    /// Extracts embedded images into an archive.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn extract_images(
        &self,
        file: &FileInput,
        format: ExtractImageFormat,
        allow_duplicates: bool,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided("extract-images")?;
        let form = file
            .attach(Form::new())
            .await?
            .text("format", format.as_str())
            .text("allowDuplicates", allow_duplicates.to_string());
        post_and_save(&self.transport, "/api/v1/misc/extract-images", form, target).await
    }

    /// Detects and straightens photographed scans inside a local document.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn extract_image_scans(
        &self,
        file: &Path,
        options: &ImageScanOptions,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        let form = Form::new()
            .part(FILE_FIELD, file_part(file).await?)
            .text("angleThreshold", options.angle_threshold.to_string())
            .text("tolerance", options.tolerance.to_string())
            .text("minArea", options.min_area.to_string())
            .text("minContourArea", options.min_contour_area.to_string())
            .text("borderSize", options.border_size.to_string());
        post_and_save(&self.transport, "/api/v1/misc/extract-image-scans", form, target).await
    }

    /// Expands compressed object streams.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn decompress(&self, file: &FileInput, target: &Path) -> Result<PathBuf, Error> {
        file.ensure_provided("decompress-pdf")?;
        let form = file.attach(Form::new()).await?;
        post_and_save(&self.transport, "/api/v1/misc/decompress-pdf", form, target).await
    }

    /// Shrinks the document toward a target size.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn compress(
        &self,
        file: &FileInput,
        options: &CompressOptions,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided("compress-pdf")?;
        let form = file
            .attach(Form::new())
            .await?
            .text("optimizeLevel", options.optimize_level.to_string())
            .text("expectedOutputSize", format!("{}kb", options.expected_output_size_kb))
            .text("linearize", options.linearize.to_string())
            .text("normalize", options.normalize.to_string())
            .text("grayscale", options.grayscale.to_string());
        post_and_save(&self.transport, "/api/v1/misc/compress-pdf", form, target).await
    }

    /// Splits the document at scanner-generated divider pages.
    ///
    /// The result arrives as a ZIP archive of the parts.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn auto_split(&self, file: &FileInput, target: &Path) -> Result<PathBuf, Error> {
        file.ensure_provided("auto-split-pdf")?;
        let form = file.attach(Form::new()).await?;
        post_and_save(&self.transport, "/api/v1/misc/auto-split-pdf", form, target).await
    }

    /// Renames the document after its detected title.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn auto_rename(
        &self,
        file: &FileInput,
        use_first_text_as_fallback: bool,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided("auto-rename")?;
        let form = file
            .attach(Form::new())
            .await?
            .text("useFirstTextAsFallback", use_first_text_as_fallback.to_string());
        post_and_save(&self.transport, "/api/v1/misc/auto-rename", form, target).await
    }

    /// Stamps pages with text or an image.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the stamp image cannot be read, the
    /// request is refused, or the result cannot be written to `target`.
    pub async fn add_stamp(
        &self,
        file: &FileInput,
        options: &StampOptions,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided("add-stamp")?;
        let mut form = file
            .attach(Form::new())
            .await?
            .text("pageNumbers", options.page_numbers.clone())
            .text("stampType", options.stamp_type.as_str())
            .text("alphabet", options.alphabet.as_str())
            .text("fontSize", options.font_size.to_string())
            .text("rotation", options.rotation.to_string())
            .text("opacity", options.opacity.to_string())
            .text("overrideX", options.override_x.to_string())
            .text("overrideY", options.override_y.to_string())
            .text("position", options.position.as_str())
            .text("customMargin", options.custom_margin.as_str())
            .text("customColor", options.custom_color.clone());
        if let Some(text) = &options.stamp_text {
            form = form.text("stampText", text.clone());
        }
        if let Some(image) = &options.stamp_image {
            form = form.part("stampImage", file_part(image).await?);
        }
        post_and_save(&self.transport, "/api/v1/misc/add-stamp", form, target).await
    }

    /// Draws an image onto the document.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the image cannot be read, the
    /// request is refused, or the result cannot be written to `target`.
    pub async fn add_image(
        &self,
        file: &FileInput,
        image: &Path,
        options: &AddImageOptions,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided("add-image")?;
        let form = file
            .attach(Form::new())
            .await?
            .part("image", file_part(image).await?)
            .text("pageNumbers", options.page_numbers.clone())
            .text("x", options.x.to_string())
            .text("y", options.y.to_string())
            .text("everyPage", options.every_page.to_string());
        post_and_save(&self.transport, "/api/v1/misc/add-image", form, target).await
    }

    /// Embeds attachment files into the document.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, an attachment cannot be read, the
    /// request is refused, or the result cannot be written to `target`.
    pub async fn add_attachments(
        &self,
        file: &FileInput,
        attachments: &[PathBuf],
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided("add-attachments")?;
        let form = file.attach(Form::new()).await?;
        let form = attach_files(form, "attachments", attachments).await?;
        post_and_save(&self.transport, "/api/v1/misc/add-attachments", form, target).await
    }
}

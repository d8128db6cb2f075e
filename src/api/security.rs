//! Document security operations (`/api/v1/security`): signatures,
//! passwords, watermarks, sanitization and redaction.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::multipart::Form;
use serde::{Deserialize, Serialize};

use super::{Alphabet, FileInput, file_part, post_and_save};
use crate::error::Error;
use crate::transport::Transport;

/// Verdict for one digital signature, as reported by the server.
///
/// Fields the server leaves out decode to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignatureValidation {
    /// Overall verdict for the signature.
    pub valid: bool,
    pub signer_name: String,
    pub signature_date: String,
    pub reason: String,
    pub location: String,
    pub error_message: String,
    /// Certificate chain verification outcome.
    pub chain_valid: bool,
    /// Trust anchor verification outcome.
    pub trust_valid: bool,
    pub not_expired: bool,
    pub not_revoked: bool,
    #[serde(rename = "issuerDN")]
    pub issuer_dn: String,
    #[serde(rename = "subjectDN")]
    pub subject_dn: String,
    pub serial_number: String,
    pub valid_from: String,
    pub valid_until: String,
    pub signature_algorithm: String,
    pub key_size: u32,
    pub version: String,
    pub key_usages: Vec<String>,
    pub self_signed: bool,
}

/// Options for stripping active or hidden content from a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizeOptions {
    /// Remove embedded JavaScript.
    pub remove_java_script: bool,
    /// Remove embedded files.
    pub remove_embedded_files: bool,
    /// Remove document metadata.
    pub remove_metadata: bool,
    /// Remove links.
    pub remove_links: bool,
    /// Remove XMP metadata streams.
    pub remove_xmp_metadata: bool,
    /// Remove embedded fonts.
    pub remove_fonts: bool,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            remove_java_script: true,
            remove_embedded_files: true,
            remove_metadata: false,
            remove_links: false,
            remove_xmp_metadata: false,
            remove_fonts: false,
        }
    }
}

/// One rectangular redaction region in page-relative coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedactRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Zero-based page index.
    pub page: u32,
    /// Fill color as a hex string.
    pub color: String,
}

impl Default for RedactRegion {
    fn default() -> Self {
        Self {
            x: 0.1,
            y: 0.1,
            width: 0.1,
            height: 0.1,
            page: 0,
            color: "#000000".to_string(),
        }
    }
}

/// Options for blacking out document regions.
#[derive(Debug, Clone, PartialEq)]
pub struct RedactOptions {
    /// Pages to redact, `"all"` or a page selection expression.
    pub page_numbers: String,
    /// Apply text redactions alongside the region.
    pub redactions: bool,
    /// Region to black out; sent as an embedded JSON field.
    pub region: RedactRegion,
    /// Color used when whole pages are redacted.
    pub page_redaction_color: String,
}

impl Default for RedactOptions {
    fn default() -> Self {
        Self {
            page_numbers: "all".to_string(),
            redactions: false,
            region: RedactRegion::default(),
            page_redaction_color: "#000000".to_string(),
        }
    }
}

/// Encryption parameters and permission restrictions for `add_password`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddPasswordOptions {
    /// Password required to open the document.
    pub password: String,
    /// Password required to change permissions.
    pub owner_password: String,
    /// Encryption key length in bits.
    pub key_length: u32,
    pub prevent_assembly: bool,
    pub prevent_extract_content: bool,
    pub prevent_extract_for_accessibility: bool,
    pub prevent_fill_in_form: bool,
    pub prevent_modify: bool,
    pub prevent_modify_annotations: bool,
    pub prevent_printing: bool,
    pub prevent_printing_faithful: bool,
}

impl Default for AddPasswordOptions {
    fn default() -> Self {
        Self {
            password: String::new(),
            owner_password: String::new(),
            key_length: 256,
            prevent_assembly: false,
            prevent_extract_content: false,
            prevent_extract_for_accessibility: false,
            prevent_fill_in_form: false,
            prevent_modify: false,
            prevent_modify_annotations: false,
            prevent_printing: false,
            prevent_printing_faithful: false,
        }
    }
}

/// Whether a watermark is rendered from text or an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatermarkType {
    Text,
    Image,
}

impl WatermarkType {
    /// Wire value of this watermark kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for WatermarkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Options for stamping a repeating watermark across pages.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkOptions {
    /// Text or image watermark.
    pub watermark_type: WatermarkType,
    /// Text to render for text watermarks.
    pub watermark_text: Option<String>,
    /// Image file for image watermarks, uploaded alongside the document.
    pub watermark_image: Option<PathBuf>,
    /// Character set the text is rendered with.
    pub alphabet: Alphabet,
    pub font_size: u32,
    pub rotation: i32,
    pub opacity: f64,
    /// Horizontal gap between repetitions.
    pub width_spacer: u32,
    /// Vertical gap between repetitions.
    pub height_spacer: u32,
    /// Watermark color as a hex string.
    pub custom_color: String,
    /// Rasterize pages so the watermark cannot be stripped.
    pub convert_pdf_to_image: bool,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            watermark_type: WatermarkType::Text,
            watermark_text: None,
            watermark_image: None,
            alphabet: Alphabet::Roman,
            font_size: 30,
            rotation: 0,
            opacity: 0.5,
            width_spacer: 50,
            height_spacer: 50,
            custom_color: "#d3d3d3".to_string(),
            convert_pdf_to_image: false,
        }
    }
}

/// Document security operations (`/api/v1/security`).
#[derive(Debug, Clone)]
pub struct SecurityApi {
    transport: Arc<Transport>,
}

impl SecurityApi {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Checks the digital signature on a PDF, optionally against a custom
    /// certificate.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, a file cannot be read, the request
    /// is refused, or the body is not a validation record.
    pub async fn validate_signature(
        &self,
        file: &FileInput,
        cert_file: Option<&Path>,
    ) -> Result<SignatureValidation, Error> {
        file.ensure_provided("validate-signature")?;
        let mut form = file.attach(Form::new()).await?;
        if let Some(cert) = cert_file {
            form = form.part("certFile", file_part(cert).await?);
        }

        let response = self
            .transport
            .post_multipart("/api/v1/security/validate-signature", form)
            .await?;
        let url = response.url().to_string();
        response.json().await.map_err(|e| Error::decode(url, e))
    }

    /// Strips active or hidden content from a PDF.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn sanitize(
        &self,
        file: &FileInput,
        options: &SanitizeOptions,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided("sanitize-pdf")?;
        let form = file
            .attach(Form::new())
            .await?
            .text("removeJavaScript", options.remove_java_script.to_string())
            .text("removeEmbeddedFiles", options.remove_embedded_files.to_string())
            .text("removeMetadata", options.remove_metadata.to_string())
            .text("removeLinks", options.remove_links.to_string())
            .text("removeXmpMetadata", options.remove_xmp_metadata.to_string())
            .text("removeFonts", options.remove_fonts.to_string());
        post_and_save(&self.transport, "/api/v1/security/sanitize-pdf", form, target).await
    }

    /// Removes the open password from an encrypted PDF.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused (including a
    /// wrong password), or the result cannot be written to `target`.
    pub async fn remove_password(
        &self,
        file: &FileInput,
        password: &str,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided("remove-password")?;
        let form = file
            .attach(Form::new())
            .await?
            .text("password", password.to_string());
        post_and_save(&self.transport, "/api/v1/security/remove-password", form, target).await
    }

    /// Removes certificate signatures from a PDF.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn remove_cert_sign(
        &self,
        file: &FileInput,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided("remove-cert-sign")?;
        let form = file.attach(Form::new()).await?;
        post_and_save(&self.transport, "/api/v1/security/remove-cert-sign", form, target).await
    }

    /// Blacks out a region of the document.
    ///
    /// The region is embedded in the form as a JSON field.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn redact(
        &self,
        file: &FileInput,
        options: &RedactOptions,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided("redact")?;
        let form = file
            .attach(Form::new())
            .await?
            .text("pageNumbers", options.page_numbers.clone())
            .text("redactions", options.redactions.to_string())
            .text("convertPdfToImage", region_json(&options.region))
            .text("pageRedactionColor", options.page_redaction_color.clone());
        post_and_save(&self.transport, "/api/v1/security/redact", form, target).await
    }

    /// Fetches the server's structural report for a PDF.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the body
    /// is not JSON.
    pub async fn pdf_info(&self, file: &FileInput) -> Result<serde_json::Value, Error> {
        file.ensure_provided("get-info-on-pdf")?;
        let form = file.attach(Form::new()).await?;
        let response = self
            .transport
            .post_multipart("/api/v1/security/get-info-on-pdf", form)
            .await?;
        let url = response.url().to_string();
        response.json().await.map_err(|e| Error::decode(url, e))
    }

    /// Encrypts a PDF and applies permission restrictions.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the request is refused, or the
    /// result cannot be written to `target`.
    pub async fn add_password(
        &self,
        file: &FileInput,
        options: &AddPasswordOptions,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided("add-password")?;
        let form = file
            .attach(Form::new())
            .await?
            .text("password", options.password.clone())
            .text("ownerPassword", options.owner_password.clone())
            .text("keyLength", options.key_length.to_string())
            .text("preventAssembly", options.prevent_assembly.to_string())
            .text("preventExtractContent", options.prevent_extract_content.to_string())
            .text(
                "preventExtractForAccessibility",
                options.prevent_extract_for_accessibility.to_string(),
            )
            .text("preventFillInForm", options.prevent_fill_in_form.to_string())
            .text("preventModify", options.prevent_modify.to_string())
            .text("preventModifyAnnotations", options.prevent_modify_annotations.to_string())
            .text("preventPrinting", options.prevent_printing.to_string())
            .text("preventPrintingFaithful", options.prevent_printing_faithful.to_string());
        post_and_save(&self.transport, "/api/v1/security/add-password", form, target).await
    }

    /// Stamps a repeating watermark across every page.
    ///
    /// # Errors
    ///
    /// Fails when the input is absent, the watermark image cannot be read,
    /// the request is refused, or the result cannot be written to `target`.
    pub async fn add_watermark(
        &self,
        file: &FileInput,
        options: &WatermarkOptions,
        target: &Path,
    ) -> Result<PathBuf, Error> {
        file.ensure_provided("add-watermark")?;
        let mut form = file
            .attach(Form::new())
            .await?
            .text("watermarkType", options.watermark_type.as_str())
            .text("alphabet", options.alphabet.as_str())
            .text("fontSize", options.font_size.to_string())
            .text("rotation", options.rotation.to_string())
            .text("opacity", options.opacity.to_string())
            .text("widthSpacer", options.width_spacer.to_string())
            .text("heightSpacer", options.height_spacer.to_string())
            .text("customColor", options.custom_color.clone())
            .text("convertPDFToImage", options.convert_pdf_to_image.to_string());
        if let Some(text) = &options.watermark_text {
            form = form.text("watermarkText", text.clone());
        }
        if let Some(image) = &options.watermark_image {
            form = form.part("watermarkImage", file_part(image).await?);
        }
        post_and_save(&self.transport, "/api/v1/security/add-watermark", form, target).await
    }
}

/// JSON form of a redaction region.
fn region_json(region: &RedactRegion) -> String {
    // Plain numeric and string fields, serialization cannot fail
    serde_json::to_string(region).unwrap_or_else(|_| "{}".to_string())
}

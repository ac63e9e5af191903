//! File-type classification: decide which extraction path a file takes.
//!
//! Classification is deliberately pure and *total*: every input maps to
//! exactly one [`ExtractionMode`]. PDFs go through the text path; anything
//! else — including unknown mime types — is treated as an image and handed to
//! the vision model. There is no rejection branch here; a file that is
//! neither a PDF nor a decodable image fails later, in content extraction,
//! where the failure can carry a useful detail message.

use std::path::Path;
use tracing::debug;

/// One uploaded document, exactly as the upload boundary delivered it.
///
/// Owned by a single pipeline run and never mutated.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original client-side filename ("monday_timetable.png").
    pub original_name: String,
    /// Mime type as reported by the upload layer. Not trusted on its own;
    /// classification also checks the filename suffix.
    pub mime_type: String,
    /// Size in bytes, as reported by the upload layer.
    pub size_bytes: u64,
    /// Full file content.
    pub content: Vec<u8>,
}

impl UploadedFile {
    /// Build an `UploadedFile` from raw parts.
    pub fn new(
        original_name: impl Into<String>,
        mime_type: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        let size_bytes = content.len() as u64;
        Self {
            original_name: original_name.into(),
            mime_type: mime_type.into(),
            size_bytes,
            content,
        }
    }

    /// Read a file from disk, inferring the mime type from its extension.
    ///
    /// Convenience for the CLI and tests; server deployments receive the
    /// mime type from the upload layer instead.
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime = mime_from_name(&name);
        Ok(Self::new(name, mime, content))
    }
}

/// Which extraction path a file takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// PDF: extract the text layer and send it as a text prompt.
    TextDocument,
    /// Everything else: normalise the image and send it to the vision model.
    VisionImage,
}

impl ExtractionMode {
    /// Human-readable path name, used in the informational run warning.
    pub fn path_name(self) -> &'static str {
        match self {
            ExtractionMode::TextDocument => "PDF text",
            ExtractionMode::VisionImage => "vision image",
        }
    }
}

/// Classify an uploaded file into its extraction mode.
///
/// Pure and total: PDF mime type or `.pdf` suffix → [`ExtractionMode::TextDocument`],
/// everything else → [`ExtractionMode::VisionImage`].
pub fn classify(file: &UploadedFile) -> ExtractionMode {
    let is_pdf = file.mime_type.eq_ignore_ascii_case("application/pdf")
        || file.original_name.to_ascii_lowercase().ends_with(".pdf");

    let mode = if is_pdf {
        ExtractionMode::TextDocument
    } else {
        ExtractionMode::VisionImage
    };
    debug!(
        "Classified '{}' ({}) as {:?}",
        file.original_name, file.mime_type, mode
    );
    mode
}

/// Map a filename extension to a mime type, defaulting to octet-stream.
fn mime_from_name(name: &str) -> String {
    let ext = name.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
    .to_string()
}

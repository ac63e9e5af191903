//! Content extraction: turn a classified upload into provider-ready content.
//!
//! Both paths are CPU-bound (PDF text decoding, image decode/resize/encode)
//! and run under `tokio::task::spawn_blocking` so they never stall the async
//! worker threads.
//!
//! ## Why PNG for the vision path?
//!
//! Lossless re-encoding preserves text crispness; JPEG artefacts on thin
//! glyphs measurably degrade vision-model reading accuracy. The downscale cap
//! keeps request sizes bounded — vision APIs tile at 512 px, so pixels beyond
//! ~2048 px on the longest edge cost tokens without adding legibility.
//! Smaller images are never enlarged: upscaling adds no information.

use crate::error::ExtractError;
use crate::pipeline::classify::{ExtractionMode, UploadedFile};
use image::imageops::FilterType;
use std::io::Cursor;
use tracing::debug;

/// Provider-ready content: either the PDF's text layer or a normalised PNG.
#[derive(Debug, Clone)]
pub enum ExtractedContent {
    /// Full extracted text of a PDF, concatenated across the document.
    Text(String),
    /// Normalised PNG bytes (≤ `max_pixels` on either dimension).
    Image(Vec<u8>),
}

/// Extract provider-ready content from an uploaded file.
///
/// Failures (corrupt image, undecodable PDF, image-only PDF with no text
/// layer) surface as [`ExtractError::ContentExtraction`]; the orchestrator
/// converts them into a warning and a zero-event result.
pub async fn extract_content(
    file: &UploadedFile,
    mode: ExtractionMode,
    max_pixels: u32,
) -> Result<ExtractedContent, ExtractError> {
    let bytes = file.content.clone();
    let filename = file.original_name.clone();

    let result = tokio::task::spawn_blocking(move || match mode {
        ExtractionMode::TextDocument => extract_pdf_text(&bytes, &filename),
        ExtractionMode::VisionImage => normalise_image(&bytes, &filename, max_pixels),
    })
    .await
    .map_err(|e| ExtractError::Internal(format!("content task panicked: {e}")))?;

    result
}

/// Blocking PDF text extraction via pdf-extract.
fn extract_pdf_text(bytes: &[u8], filename: &str) -> Result<ExtractedContent, ExtractError> {
    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
        ExtractError::ContentExtraction {
            filename: filename.to_string(),
            detail: format!("PDF text extraction failed: {e}"),
        }
    })?;

    // A scanned/image-only PDF yields an empty text layer. Recovering those
    // via OCR is out of scope; fail here with a message that says why.
    if text.trim().is_empty() {
        return Err(ExtractError::ContentExtraction {
            filename: filename.to_string(),
            detail: "PDF has no extractable text layer (scanned or image-only document)".into(),
        });
    }

    debug!("Extracted {} chars of PDF text from '{}'", text.len(), filename);
    Ok(ExtractedContent::Text(text))
}

/// Blocking image normalisation: decode, cap the longest edge, re-encode PNG.
fn normalise_image(
    bytes: &[u8],
    filename: &str,
    max_pixels: u32,
) -> Result<ExtractedContent, ExtractError> {
    let img = image::load_from_memory(bytes).map_err(|e| ExtractError::ContentExtraction {
        filename: filename.to_string(),
        detail: format!("image decode failed: {e}"),
    })?;

    let (w, h) = (img.width(), img.height());
    // Shrink-only: `resize` preserves aspect ratio and fits within the box,
    // but it would also enlarge small images, so guard explicitly.
    let img = if w > max_pixels || h > max_pixels {
        let resized = img.resize(max_pixels, max_pixels, FilterType::Lanczos3);
        debug!(
            "Resized '{}' {}x{} → {}x{}",
            filename,
            w,
            h,
            resized.width(),
            resized.height()
        );
        resized
    } else {
        img
    };

    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| ExtractError::ContentExtraction {
            filename: filename.to_string(),
            detail: format!("PNG re-encode failed: {e}"),
        })?;

    debug!(
        "Normalised '{}' → {} PNG bytes ({}x{})",
        filename,
        buf.len(),
        img.width(),
        img.height()
    );
    Ok(ExtractedContent::Image(buf))
}

//! Extraction instructions for the inference provider.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing the expected JSON layout or
//!    adding a field means editing exactly one place (plus the matching
//!    expectations in the response normaliser).
//!
//! 2. **Testability** — unit tests can inspect the built request without a
//!    live model, making prompt regressions easy to catch.
//!
//! Together with [`crate::pipeline::normalize`], this module is the only
//! place coupled to the provider's request/reply shape. Swapping providers
//! means revisiting these two modules, not the rest of the pipeline.

use crate::config::ExtractionConfig;
use crate::pipeline::content::ExtractedContent;
use crate::provider::{ImagePayload, ProviderRequest};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Default instruction for extracting a timetable into JSON.
///
/// Used when `ExtractionConfig::instruction` is `None`.
pub const DEFAULT_INSTRUCTION: &str = r#"You are an expert at reading school and work timetables. Extract every scheduled event from the document into structured JSON.

Follow these rules precisely:

1. HEADER METADATA
   - If the document shows a school name, class name, term, teacher name, or
     academic year, capture them in the "metadata" object
   - Omit metadata fields that are not present; never invent them

2. EVENTS
   - List EVERY scheduled event, one entry per cell/row, including repeats
   - "title" is the subject or activity name, exactly as written
   - "day" is the full English weekday name (Monday .. Sunday)
   - "startTime" and "endTime" use 24-hour clock, HH:MM or HH:MM:SS
   - Include "location", "description", bracketed annotations as "metadata",
     "subject", and "additionalInfo" only when the document shows them

3. OUTPUT FORMAT
   - Return ONLY a single JSON object, nothing else
   - Do NOT wrap the JSON in ``` fences
   - Do NOT add commentary, explanations, or markdown
   - Use exactly this layout:

{
  "metadata": {
    "schoolName": "...",
    "className": "...",
    "term": "...",
    "teacherName": "...",
    "academicYear": "..."
  },
  "events": [
    {
      "title": "...",
      "day": "...",
      "startTime": "HH:MM",
      "endTime": "HH:MM",
      "location": "...",
      "description": "...",
      "metadata": "...",
      "subject": "...",
      "additionalInfo": "..."
    }
  ]
}"#;

/// Build the provider request for one extraction run.
///
/// Text content is embedded directly into the instruction; image content is
/// bundled alongside it as a base64 PNG payload.
pub fn build_request(content: &ExtractedContent, config: &ExtractionConfig) -> ProviderRequest {
    let instruction = config
        .instruction
        .as_deref()
        .unwrap_or(DEFAULT_INSTRUCTION);

    match content {
        ExtractedContent::Text(text) => ProviderRequest {
            prompt: format!(
                "{instruction}\n\nThe timetable document text follows:\n\n\"\"\"\n{text}\n\"\"\""
            ),
            image: None,
        },
        ExtractedContent::Image(png) => ProviderRequest {
            prompt: instruction.to_string(),
            image: Some(ImagePayload {
                media_type: "image/png".to_string(),
                base64_data: STANDARD.encode(png),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_mode_embeds_document_text() {
        let config = ExtractionConfig::default();
        let req = build_request(
            &ExtractedContent::Text("Mon 09:00 Maths Room 4".into()),
            &config,
        );
        assert!(req.image.is_none());
        assert!(req.prompt.contains("Mon 09:00 Maths Room 4"));
        assert!(req.prompt.contains("startTime"));
    }

    #[test]
    fn image_mode_bundles_base64_png() {
        let config = ExtractionConfig::default();
        let req = build_request(&ExtractedContent::Image(vec![1, 2, 3]), &config);
        let img = req.image.expect("image payload");
        assert_eq!(img.media_type, "image/png");
        assert_eq!(STANDARD.decode(&img.base64_data).unwrap(), vec![1, 2, 3]);
        assert!(!req.prompt.contains("\"\"\""));
    }

    #[test]
    fn custom_instruction_overrides_default() {
        let config = ExtractionConfig::builder()
            .instruction("return {} only")
            .build()
            .unwrap();
        let req = build_request(&ExtractedContent::Text("x".into()), &config);
        assert!(req.prompt.starts_with("return {} only"));
        assert!(!req.prompt.contains("HEADER METADATA"));
    }

    #[test]
    fn default_instruction_names_every_event_field() {
        for field in [
            "title",
            "day",
            "startTime",
            "endTime",
            "location",
            "description",
            "metadata",
            "subject",
            "additionalInfo",
        ] {
            assert!(
                DEFAULT_INSTRUCTION.contains(field),
                "instruction must mention {field}"
            );
        }
    }
}

//! End-to-end pipeline tests against a scripted inference provider.
//!
//! The provider seam lets these tests drive the full pipeline — classify,
//! content, prompt, invoke, normalize, validate, transform — without a live
//! model, using replies that reproduce real model quirks (fences, prose,
//! combined timestamps, garbage).

use async_trait::async_trait;
use schedscan::{
    extract, ExtractError, ExtractionConfig, InferenceProvider, MemoryStore, ProviderRequest,
    ResultStore, StoreError, UploadedFile,
};
use std::io::Cursor;
use std::sync::{Arc, Mutex};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Provider returning a canned reply (or failure), recording every request.
struct ScriptedProvider {
    reply: Result<String, String>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn failing(detail: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(detail.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl InferenceProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &ProviderRequest) -> Result<String, ExtractError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(detail) => Err(ExtractError::ProviderInvocation {
                detail: detail.clone(),
            }),
        }
    }
}

fn config_with(provider: Arc<ScriptedProvider>) -> ExtractionConfig {
    ExtractionConfig::builder()
        .provider(provider)
        .build()
        .expect("valid config")
}

/// A small but real PNG upload, so the vision content path actually decodes.
fn png_upload(name: &str) -> UploadedFile {
    let img = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        64,
        48,
        image::Rgba([250, 250, 250, 255]),
    ));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    UploadedFile::new(name, "image/png", buf)
}

const TWO_EVENT_REPLY: &str = r#"{
  "metadata": {"schoolName": "Northside Primary", "term": "Autumn 2025"},
  "events": [
    {"title": "Mathematics", "day": "Monday", "startTime": "09:00", "endTime": "10:00", "location": "Room 4"},
    {"title": "History", "day": "Tuesday", "startTime": "13:30", "endTime": "14:30", "description": "bring textbook"}
  ]
}"#;

// ── Success paths ────────────────────────────────────────────────────────────

#[tokio::test]
async fn two_event_fixture_round_trips() {
    let provider = ScriptedProvider::replying(TWO_EVENT_REPLY);
    let result = extract(&png_upload("week.png"), &config_with(provider)).await;

    assert_eq!(result.events.len(), 2);
    let maths = &result.events[0];
    assert_eq!(maths.name, "Mathematics");
    assert_eq!(maths.day, "Monday");
    assert_eq!(maths.duration_minutes, 60);
    assert_eq!(maths.location, "Room 4");
    let history = &result.events[1];
    assert_eq!(history.duration_minutes, 60);
    assert_eq!(history.notes, "bring textbook");
    assert!(result.events.iter().all(|e| e.confidence == 0.85));

    let meta = result.metadata.expect("header metadata");
    assert_eq!(meta.school_name.as_deref(), Some("Northside Primary"));
    assert_eq!(meta.term.as_deref(), Some("Autumn 2025"));

    // Successful run carries exactly the informational path warning.
    assert_eq!(result.warnings, vec!["extracted via vision image path"]);

    assert_eq!(result.source.filename, "week.png");
    assert_eq!(result.source.mimetype, "image/png");
}

#[tokio::test]
async fn fenced_reply_with_prose_still_parses() {
    let reply = format!(
        "Sure! Here is the extracted timetable:\n```json\n{TWO_EVENT_REPLY}\n```\nHope that helps."
    );
    let provider = ScriptedProvider::replying(&reply);
    let result = extract(&png_upload("fenced.png"), &config_with(provider)).await;
    assert_eq!(result.events.len(), 2);
}

#[tokio::test]
async fn clean_reply_is_a_pass_through() {
    // Already-valid JSON with day supplied: nothing to derive beyond
    // duration/confidence/defaults.
    let reply = r#"{"events": [{"title": "Art", "day": "Friday",
        "startTime": "11:00", "endTime": "12:15", "subject": "Fine Art"}]}"#;
    let provider = ScriptedProvider::replying(reply);
    let result = extract(&png_upload("clean.png"), &config_with(provider)).await;

    let ev = &result.events[0];
    assert_eq!(ev.name, "Art");
    assert_eq!(ev.day, "Friday");
    assert_eq!(ev.start_time, "11:00");
    assert_eq!(ev.end_time, "12:15");
    assert_eq!(ev.duration_minutes, 75);
    assert_eq!(ev.subject, "Fine Art");
    assert_eq!(ev.location, "");
}

#[tokio::test]
async fn combined_timestamp_is_rewritten_to_day_and_clock_time() {
    // 2025-11-03 is a Monday.
    let reply = r#"{"events": [{"title": "Assembly",
        "startTime": "2025-11-03T13:30:00", "endTime": "2025-11-03T14:30:00"}]}"#;
    let provider = ScriptedProvider::replying(reply);
    let result = extract(&png_upload("dated.png"), &config_with(provider)).await;

    let ev = &result.events[0];
    assert_eq!(ev.day, "Monday");
    assert_eq!(ev.start_time, "13:30:00");
    assert_eq!(ev.end_time, "14:30:00");
    assert_eq!(ev.duration_minutes, 60);
}

#[tokio::test]
async fn missing_day_defaults_to_monday() {
    let reply = r#"{"events": [{"title": "Gym", "startTime": "08:00", "endTime": "09:00"}]}"#;
    let provider = ScriptedProvider::replying(reply);
    let result = extract(&png_upload("noday.png"), &config_with(provider)).await;
    assert_eq!(result.events[0].day, "Monday");
}

#[tokio::test]
async fn negative_duration_is_preserved_and_warned() {
    let reply = r#"{"events": [{"title": "Night shift", "day": "Friday",
        "startTime": "22:00", "endTime": "01:00"}]}"#;
    let provider = ScriptedProvider::replying(reply);
    let result = extract(&png_upload("overnight.png"), &config_with(provider)).await;

    assert_eq!(result.events[0].duration_minutes, -1260);
    assert!(
        result
            .warnings
            .iter()
            .any(|w| w.contains("negative duration")),
        "warnings: {:?}",
        result.warnings
    );
}

#[tokio::test]
async fn vision_request_bundles_normalised_image() {
    let provider = ScriptedProvider::replying(TWO_EVENT_REPLY);
    extract(&png_upload("week.png"), &config_with(Arc::clone(&provider))).await;

    let requests = provider.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let image = requests[0].image.as_ref().expect("vision image payload");
    assert_eq!(image.media_type, "image/png");
    assert!(!image.base64_data.is_empty());
    assert!(requests[0].prompt.contains("startTime"));
}

// ── Failure paths: always a result, never an error ──────────────────────────

#[tokio::test]
async fn unreadable_image_yields_empty_events_and_one_warning() {
    let provider = ScriptedProvider::replying(TWO_EVENT_REPLY);
    let file = UploadedFile::new("broken.png", "image/png", b"not an image at all".to_vec());
    let result = extract(&file, &config_with(Arc::clone(&provider))).await;

    assert!(result.events.is_empty());
    assert_eq!(result.warnings.len(), 1, "warnings: {:?}", result.warnings);
    assert!(result.warnings[0].contains("broken.png"));
    // The provider must never have been reached.
    assert!(provider.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn corrupt_pdf_yields_empty_events_and_one_warning() {
    let provider = ScriptedProvider::replying(TWO_EVENT_REPLY);
    let file = UploadedFile::new("junk.pdf", "application/pdf", b"%PDF-nope".to_vec());
    let result = extract(&file, &config_with(provider)).await;

    assert!(result.events.is_empty());
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("junk.pdf"));
}

#[tokio::test]
async fn provider_failure_becomes_warning_after_path_note() {
    let provider = ScriptedProvider::failing("connection reset by peer");
    let result = extract(&png_upload("week.png"), &config_with(provider)).await;

    assert!(result.events.is_empty());
    // Partial progress (content extraction) keeps its warning; the failure
    // description follows in encounter order.
    assert_eq!(result.warnings.len(), 2);
    assert_eq!(result.warnings[0], "extracted via vision image path");
    assert!(result.warnings[1].contains("connection reset by peer"));
}

#[tokio::test]
async fn reply_without_json_becomes_warning() {
    let provider = ScriptedProvider::replying("I cannot see a timetable in this image.");
    let result = extract(&png_upload("week.png"), &config_with(provider)).await;

    assert!(result.events.is_empty());
    assert!(result.warnings.iter().any(|w| w.contains("no JSON")));
}

#[tokio::test]
async fn malformed_json_becomes_warning() {
    let provider = ScriptedProvider::replying(r#"{"events": [{"title": "Maths",]}"#);
    let result = extract(&png_upload("week.png"), &config_with(provider)).await;

    assert!(result.events.is_empty());
    assert!(result.warnings.iter().any(|w| w.contains("malformed JSON")));
}

#[tokio::test]
async fn one_invalid_event_rejects_the_whole_reply() {
    let reply = r#"{"events": [
        {"title": "Maths", "startTime": "09:00", "endTime": "10:00"},
        {"title": "", "startTime": "10:00", "endTime": "11:00"}
    ]}"#;
    let provider = ScriptedProvider::replying(reply);
    let result = extract(&png_upload("week.png"), &config_with(provider)).await;

    // All-or-nothing: the valid sibling is not kept.
    assert!(result.events.is_empty());
    assert!(result.warnings.iter().any(|w| w.contains("validation")));
}

#[tokio::test]
async fn slow_provider_hits_deadline() {
    struct Stalled;

    #[async_trait]
    impl InferenceProvider for Stalled {
        fn name(&self) -> &str {
            "stalled"
        }
        async fn complete(&self, _request: &ProviderRequest) -> Result<String, ExtractError> {
            tokio::time::sleep(std::time::Duration::from_secs(30)).await;
            Ok(String::new())
        }
    }

    let config = ExtractionConfig::builder()
        .provider(Arc::new(Stalled))
        .api_timeout_secs(1)
        .build()
        .unwrap();
    let result = extract(&png_upload("week.png"), &config).await;

    assert!(result.events.is_empty());
    assert!(result.warnings.iter().any(|w| w.contains("timed out")));
}

#[tokio::test]
async fn from_path_infers_mime_and_feeds_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("week.png");
    std::fs::write(&path, png_upload("week.png").content).unwrap();

    let file = UploadedFile::from_path(&path).unwrap();
    assert_eq!(file.mime_type, "image/png");
    assert_eq!(file.original_name, "week.png");

    let provider = ScriptedProvider::replying(TWO_EVENT_REPLY);
    let result = extract(&file, &config_with(provider)).await;
    assert_eq!(result.events.len(), 2);
}

// ── Persistence boundary ─────────────────────────────────────────────────────

#[tokio::test]
async fn result_round_trips_through_store() {
    let provider = ScriptedProvider::replying(TWO_EVENT_REPLY);
    let result = extract(&png_upload("week.png"), &config_with(provider)).await;

    let store = MemoryStore::new();
    let stored = store.save(result).await.unwrap();
    let fetched = store.get(stored.id).await.unwrap();

    assert_eq!(fetched.result.events.len(), 2);
    assert_eq!(fetched.result.source.filename, "week.png");

    // Wire shape: id plus flattened result fields.
    let json = serde_json::to_value(&fetched).unwrap();
    assert!(json.get("id").is_some());
    assert!(json.get("source").is_some());
    assert!(json.get("events").is_some());
    assert!(json.get("warnings").is_some());

    let missing = store.get(uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(missing, StoreError::NotFound { .. }));
}

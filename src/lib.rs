//! # schedscan
//!
//! Extract structured timetable data from uploaded documents (images or
//! PDFs) using generative vision/language models.
//!
//! ## Why this crate?
//!
//! Timetables arrive as photos of noticeboards, screenshots, and exported
//! PDFs — layouts too varied for template-based parsing. Instead this crate
//! hands the document to a vision/language model and treats the model's
//! reply as hostile input: it is sanitised, schema-validated, and normalised
//! into a strict event shape before anything is persisted.
//!
//! ## Pipeline Overview
//!
//! ```text
//! UploadedFile
//!  │
//!  ├─ 1. Classify   PDF → text path, everything else → vision path
//!  ├─ 2. Content    PDF text extraction / image normalise (≤2048 px PNG)
//!  ├─ 3. Prompt     extraction instruction (+ base64 image for vision)
//!  ├─ 4. Invoke     deadline-bound call to gpt-4.1-nano / claude / gemini / …
//!  ├─ 5. Normalize  strip fences, isolate JSON, derive day/time fields
//!  ├─ 6. Validate   all-or-nothing schema gate (typed events out)
//!  └─ 7. Transform  durations, defaults, confidence → ExtractionResult
//! ```
//!
//! A run never fails to its caller: any stage error becomes a warning on an
//! empty-event result. See [`extract`] for the policy.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use schedscan::{extract, ExtractionConfig, UploadedFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / …
//!     let file = UploadedFile::from_path("timetable.png")?;
//!     let config = ExtractionConfig::default();
//!     let result = extract(&file, &config).await;
//!     for event in &result.events {
//!         println!("{} {} {}–{}", event.day, event.name, event.start_time, event.end_time);
//!     }
//!     for warning in &result.warnings {
//!         eprintln!("warning: {warning}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `schedscan` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! schedscan = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod provider;
pub mod store;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use error::ExtractError;
pub use extract::{extract, extract_sync};
pub use output::{ExtractionResult, PersistedEvent, SourceInfo, TimetableMetadata};
pub use pipeline::classify::{ExtractionMode, UploadedFile};
pub use provider::{ImagePayload, InferenceProvider, ProviderRequest};
pub use store::{MemoryStore, ResultStore, StoreError, StoredExtraction};

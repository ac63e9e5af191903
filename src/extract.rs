//! Extraction orchestrator: the pipeline entry point.
//!
//! ## Failure policy
//!
//! [`extract`] never fails to its caller. The pipeline is a linear state
//! machine — classify → content → prompt → invoke → normalize → validate →
//! transform — with a single failure sink: any stage error is caught here,
//! rendered into a warning, and the run still produces a well-formed
//! [`ExtractionResult`] with empty `events`. Callers distinguish success from
//! failure by `events.is_empty()` plus the warnings, not by an error channel.
//! The surrounding request layer is free to map an empty-events outcome to
//! whatever status code it likes; the core does not throw.
//!
//! Warnings accumulate in encounter order and are never reset once partial
//! progress occurred: a run that got past content extraction keeps its
//! path-informational warning even when a later stage fails.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::output::{ExtractionResult, PersistedEvent, SourceInfo, TimetableMetadata};
use crate::pipeline::classify::{classify, UploadedFile};
use crate::pipeline::{content, invoke, normalize, transform, validate};
use crate::prompts;
use crate::provider::resolve_provider;
use chrono::Utc;
use std::time::Instant;
use tracing::{info, warn};

/// Run the extraction pipeline on one uploaded file.
///
/// Always returns a result; total failure is an empty `events` list with the
/// failure described in `warnings`.
pub async fn extract(file: &UploadedFile, config: &ExtractionConfig) -> ExtractionResult {
    let start = Instant::now();
    info!(
        "Starting extraction: '{}' ({}, {} bytes)",
        file.original_name, file.mime_type, file.size_bytes
    );

    let source = SourceInfo {
        filename: file.original_name.clone(),
        mimetype: file.mime_type.clone(),
        size: file.size_bytes,
        processed_at: Utc::now(),
    };

    let mut warnings = Vec::new();
    let (metadata, events) = match run_pipeline(file, config, &mut warnings).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("Extraction of '{}' failed: {e}", file.original_name);
            warnings.push(e.to_string());
            (None, Vec::new())
        }
    };

    info!(
        "Extraction of '{}' finished: {} events, {} warnings, {:?}",
        file.original_name,
        events.len(),
        warnings.len(),
        start.elapsed()
    );

    ExtractionResult {
        source,
        metadata,
        events,
        warnings,
    }
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_sync(
    file: &UploadedFile,
    config: &ExtractionConfig,
) -> Result<ExtractionResult, ExtractError> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| ExtractError::Internal(format!("failed to create tokio runtime: {e}")))?;
    Ok(runtime.block_on(extract(file, config)))
}

/// The fallible interior of a run; every `?` lands in the failure sink above.
async fn run_pipeline(
    file: &UploadedFile,
    config: &ExtractionConfig,
    warnings: &mut Vec<String>,
) -> Result<(Option<TimetableMetadata>, Vec<PersistedEvent>), ExtractError> {
    // ── Classify ─────────────────────────────────────────────────────────
    let mode = classify(file);

    // ── Extract content ──────────────────────────────────────────────────
    let extracted = content::extract_content(file, mode, config.max_image_pixels).await?;
    warnings.push(format!("extracted via {} path", mode.path_name()));

    // ── Build prompt ─────────────────────────────────────────────────────
    let request = prompts::build_request(&extracted, config);

    // ── Invoke provider ──────────────────────────────────────────────────
    let provider = resolve_provider(config)?;
    let reply = invoke::invoke(&provider, &request, config.api_timeout_secs).await?;

    // ── Normalize → Validate → Transform ─────────────────────────────────
    let candidate = normalize::normalize(&reply)?;
    let validated = validate::validate(&candidate)?;
    let events = transform::transform(validated.events);

    for event in &events {
        if event.duration_minutes < 0 {
            warnings.push(format!(
                "event '{}' has negative duration ({} min): end {} precedes start {}",
                event.name, event.duration_minutes, event.end_time, event.start_time
            ));
        }
    }

    let metadata = validated.metadata.filter(|m| !m.is_empty());
    Ok((metadata, events))
}

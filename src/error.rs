//! Error types for the schedscan library.
//!
//! Every variant of [`ExtractError`] is terminal *within one extraction run*
//! but none of them ever escapes the orchestrator: [`crate::extract`] catches
//! each one locally and turns it into a warning on an empty-event
//! [`crate::ExtractionResult`]. The typed taxonomy exists so that each
//! pipeline stage can report precisely what went wrong, and so tests can
//! assert on the failure kind rather than on message substrings.
//!
//! Storage has its own small error type, [`StoreError`], defined in
//! [`crate::store`] next to the trait it belongs to.

use thiserror::Error;

/// All failures the extraction pipeline can produce.
///
/// Callers of [`crate::extract`] never see these — they see a result whose
/// `warnings` carry the rendered message. The `Err` channel is used only
/// between stages inside the pipeline.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Content errors ────────────────────────────────────────────────────
    /// The uploaded bytes could not be read as the classified content kind
    /// (corrupt image, undecodable PDF, empty text layer).
    #[error("Content extraction failed for '{filename}': {detail}")]
    ContentExtraction { filename: String, detail: String },

    // ── Provider errors ───────────────────────────────────────────────────
    /// No inference provider could be resolved (missing API key etc.).
    #[error("Inference provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The provider call failed (network error, API rejection).
    #[error("Inference provider call failed: {detail}")]
    ProviderInvocation { detail: String },

    /// The provider call exceeded the configured deadline.
    #[error("Inference provider call timed out after {secs}s")]
    ProviderTimeout { secs: u64 },

    // ── Reply errors ──────────────────────────────────────────────────────
    /// The model reply contained no JSON object at all.
    #[error("Model reply contains no JSON object")]
    NoJsonFound,

    /// A JSON payload was located in the reply but failed to parse.
    #[error("Model reply contains malformed JSON: {detail}")]
    MalformedJson { detail: String },

    /// The parsed JSON is structurally present but semantically invalid
    /// (missing events array, empty title, bad time format).
    #[error("Extracted schedule failed validation: {detail}")]
    SchemaValidation { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (task join failure and the like).
    #[error("Internal error: {0}")]
    Internal(String),
}

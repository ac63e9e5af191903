//! The inference-provider seam.
//!
//! The pipeline talks to exactly one trait, [`InferenceProvider`]: a prompt
//! (optionally with an image) in, free-form text out. Everything
//! provider-specific — message layout, completion options, API-key plumbing —
//! lives behind [`EdgequakeProvider`], the adapter over `edgequake-llm`.
//!
//! Keeping the seam this narrow is deliberate: a retry-with-fallback policy
//! (an ordered list of providers with bounded attempts) can later be slotted
//! in as another `InferenceProvider` implementation wrapping several inner
//! ones, without touching classification, normalisation, validation, or
//! transformation. Tests exploit the same seam with scripted mocks.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, ImageData, LLMProvider, ProviderFactory};
use std::sync::Arc;
use tracing::debug;

/// One request to the inference provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// Full instruction text (document text embedded for the PDF path).
    pub prompt: String,
    /// Normalised image, present only on the vision path.
    pub image: Option<ImagePayload>,
}

/// Base64 image attachment for vision requests.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub media_type: String,
    pub base64_data: String,
}

/// The callable boundary to the generative model.
///
/// Implementations must be cheap to clone behind an `Arc` and safe to share
/// across concurrent extraction runs.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Provider name for logs and error messages.
    fn name(&self) -> &str;

    /// Send one request and return the raw, untrusted reply text.
    async fn complete(&self, request: &ProviderRequest) -> Result<String, ExtractError>;
}

/// [`InferenceProvider`] backed by an `edgequake-llm` provider.
pub struct EdgequakeProvider {
    inner: Arc<dyn LLMProvider>,
    name: String,
    temperature: f32,
    max_tokens: usize,
}

impl EdgequakeProvider {
    /// Wrap an already-constructed `edgequake-llm` provider.
    pub fn new(
        inner: Arc<dyn LLMProvider>,
        name: impl Into<String>,
        config: &ExtractionConfig,
    ) -> Self {
        Self {
            inner,
            name: name.into(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
impl InferenceProvider for EdgequakeProvider {
    fn name(&self) -> &str {
        &self.name
    }

    /// ## Message layout
    ///
    /// 1. **System message** — the extraction instruction (document text
    ///    already embedded for the PDF path)
    /// 2. **User message** — the normalised PNG as a base64 attachment, or an
    ///    empty turn for the text path (vision APIs require at least one user
    ///    turn to respond to; the system message carries all the content)
    async fn complete(&self, request: &ProviderRequest) -> Result<String, ExtractError> {
        let messages = vec![
            ChatMessage::system(request.prompt.as_str()),
            ChatMessage::user_with_images(
                "",
                match &request.image {
                    Some(img) => vec![
                        ImageData::new(img.base64_data.clone(), img.media_type.clone())
                            .with_detail("high"),
                    ],
                    None => vec![],
                },
            ),
        ];

        let options = CompletionOptions {
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
            ..Default::default()
        };

        let response = self
            .inner
            .chat(&messages, Some(&options))
            .await
            .map_err(|e| ExtractError::ProviderInvocation {
                detail: format!("{e}"),
            })?;

        debug!(
            "Provider '{}': {} input tokens, {} output tokens",
            self.name, response.prompt_tokens, response.completion_tokens
        );
        Ok(response.content)
    }
}

/// Resolve the inference provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`) — used as-is. This is the
///    seam tests and middleware use.
/// 2. **Named provider + model** (`config.provider_name`) — constructed via
///    `ProviderFactory`, which reads the matching API key from the
///    environment.
/// 3. **OpenAI preference** — when `OPENAI_API_KEY` is set, OpenAI is chosen
///    even if other provider keys are also present.
/// 4. **Full auto-detection** (`ProviderFactory::from_env`) — the factory
///    scans all known API-key variables and picks the first available.
pub fn resolve_provider(
    config: &ExtractionConfig,
) -> Result<Arc<dyn InferenceProvider>, ExtractError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or("gpt-4.1-nano");
        return create_named(name, model, config);
    }

    if let Ok(key) = std::env::var("OPENAI_API_KEY") {
        if !key.is_empty() {
            let model = config.model.as_deref().unwrap_or("gpt-4.1-nano");
            return create_named("openai", model, config);
        }
    }

    let (llm, _embedding) =
        ProviderFactory::from_env().map_err(|e| ExtractError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No inference provider could be auto-detected from the environment.\n\
                 Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or configure a provider.\n\
                 Error: {e}"
            ),
        })?;
    Ok(Arc::new(EdgequakeProvider::new(llm, "auto", config)))
}

/// Instantiate a named provider with the given model.
fn create_named(
    provider_name: &str,
    model: &str,
    config: &ExtractionConfig,
) -> Result<Arc<dyn InferenceProvider>, ExtractError> {
    let inner = ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        ExtractError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })?;
    Ok(Arc::new(EdgequakeProvider::new(
        inner,
        provider_name,
        config,
    )))
}

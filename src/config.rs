//! Configuration for a timetable extraction run.
//!
//! All pipeline behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across concurrent runs and to diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! The builder lets callers set only what they care about and rely on
//! documented defaults for the rest; adding a field later does not break
//! existing call sites.

use crate::error::ExtractError;
use crate::provider::InferenceProvider;
use std::fmt;
use std::sync::Arc;

/// Configuration for one extraction pipeline run.
///
/// Built via [`ExtractionConfig::builder()`] or
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use schedscan::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .model("gpt-4.1-nano")
///     .api_timeout_secs(30)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// LLM model identifier, e.g. "gpt-4.1-nano", "claude-sonnet-4-20250514".
    /// If None, uses the provider default.
    pub model: Option<String>,

    /// Provider name (e.g. "openai", "anthropic", "ollama").
    /// If None along with `provider`, the provider is auto-detected from the
    /// environment.
    pub provider_name: Option<String>,

    /// Pre-constructed inference provider. Takes precedence over
    /// `provider_name`. This is the seam used by tests and by callers that
    /// need custom middleware (caching, rate-limiting, fallback chains).
    pub provider: Option<Arc<dyn InferenceProvider>>,

    /// Sampling temperature for the completion. Default: 0.1.
    ///
    /// Low temperature keeps the model faithful to what is actually on the
    /// document, which is exactly what structured extraction wants.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 4096.
    ///
    /// A dense weekly timetable rarely exceeds 1 500 output tokens; 4 096
    /// leaves headroom without making a runaway reply expensive.
    pub max_tokens: usize,

    /// Maximum image dimension (width or height) in pixels after
    /// normalisation. Default: 2048.
    ///
    /// Uploaded photos can be 4000 px and larger; vision APIs tile images at
    /// 512 px so anything beyond ~2048 px adds cost without adding legibility.
    /// Smaller images are never enlarged.
    pub max_image_pixels: u32,

    /// Per-call inference deadline in seconds. Default: 60.
    ///
    /// A single slow provider call must not hold a request slot indefinitely;
    /// the invoke stage wraps the call in `tokio::time::timeout` with this
    /// value.
    pub api_timeout_secs: u64,

    /// Custom extraction instruction. If None, uses the built-in default
    /// from [`crate::prompts`].
    pub instruction: Option<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            model: None,
            provider_name: None,
            provider: None,
            temperature: 0.1,
            max_tokens: 4096,
            max_image_pixels: 2048,
            api_timeout_secs: 60,
            instruction: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field(
                "provider",
                &self.provider.as_ref().map(|_| "<dyn InferenceProvider>"),
            )
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_image_pixels", &self.max_image_pixels)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn InferenceProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn max_image_pixels(mut self, px: u32) -> Self {
        self.config.max_image_pixels = px.max(100);
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn instruction(mut self, text: impl Into<String>) -> Self {
        self.config.instruction = Some(text.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if c.api_timeout_secs == 0 {
            return Err(ExtractError::InvalidConfig(
                "API timeout must be ≥ 1 second".into(),
            ));
        }
        if c.max_image_pixels < 100 {
            return Err(ExtractError::InvalidConfig(format!(
                "max_image_pixels must be ≥ 100, got {}",
                c.max_image_pixels
            )));
        }
        Ok(self.config)
    }
}

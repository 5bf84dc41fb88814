//! Model interaction: send the prompt, get the raw completion back.
//!
//! Prompt wording lives in [`crate::prompts`] and interpretation of the
//! answer lives in [`crate::pipeline::parse`].
//!
//! There is exactly one call per generation. No streaming, no retries and no
//! timeout beyond the transport default; every provider failure collapses
//! into [`SiteGenError::GenerationFailed`].

use crate::config::GenerationConfig;
use crate::error::SiteGenError;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Raw model output for one prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    pub content: String,
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
}

impl Completion {
    /// A completion with no token accounting.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }
}

/// Anything that can turn a prompt into a completion.
///
/// The pipeline only talks to this trait, so tests can script the model's
/// answer and callers can plug in their own transport.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<Completion, SiteGenError>;
}

/// [`CompletionBackend`] over an `edgequake-llm` provider.
pub struct LlmBackend {
    provider: Arc<dyn LLMProvider>,
    options: CompletionOptions,
}

impl LlmBackend {
    pub fn new(provider: Arc<dyn LLMProvider>, config: &GenerationConfig) -> Self {
        Self {
            provider,
            options: build_options(config),
        }
    }
}

#[async_trait]
impl CompletionBackend for LlmBackend {
    async fn complete(&self, prompt: &str) -> Result<Completion, SiteGenError> {
        let start = Instant::now();
        let messages = vec![ChatMessage::user(prompt)];

        match self.provider.chat(&messages, Some(&self.options)).await {
            Ok(response) => {
                debug!(
                    "Completion: {} input tokens, {} output tokens, {:?}",
                    response.prompt_tokens,
                    response.completion_tokens,
                    start.elapsed()
                );
                Ok(Completion {
                    content: response.content,
                    prompt_tokens: response.prompt_tokens,
                    completion_tokens: response.completion_tokens,
                })
            }
            Err(e) => {
                warn!("Model call failed after {:?}: {}", start.elapsed(), e);
                Err(SiteGenError::GenerationFailed {
                    message: e.to_string(),
                })
            }
        }
    }
}

/// Build `CompletionOptions` from the generation config.
fn build_options(config: &GenerationConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: config.max_tokens,
        ..Default::default()
    }
}

/// Fail fast when the API key variable is missing or blank.
pub fn require_api_key(var: &str) -> Result<(), SiteGenError> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(SiteGenError::ApiKeyMissing {
            var: var.to_string(),
        }),
    }
}

/// Resolve the completion backend, from most-specific to least-specific.
///
/// 1. **Pre-built backend** (`config.backend`) — used as-is; no key check.
/// 2. **Named provider + model** — the API key variable must be set, then
///    [`ProviderFactory::create_llm_provider`] builds the provider and reads
///    the key from the environment itself.
pub fn resolve_backend(
    config: &GenerationConfig,
) -> Result<Arc<dyn CompletionBackend>, SiteGenError> {
    if let Some(ref backend) = config.backend {
        return Ok(Arc::clone(backend));
    }

    require_api_key(&config.api_key_env)?;

    let provider = ProviderFactory::create_llm_provider(&config.provider_name, &config.model)
        .map_err(|e| SiteGenError::ProviderNotConfigured {
            provider: config.provider_name.clone(),
            hint: format!("{e}"),
        })?;

    info!(
        "Using provider '{}' with model '{}' (temperature {})",
        config.provider_name, config.model, config.temperature
    );
    Ok(Arc::new(LlmBackend::new(provider, config)))
}

/// Run the single completion call for a prompt.
pub async fn generate(
    backend: &Arc<dyn CompletionBackend>,
    prompt: &str,
) -> Result<Completion, SiteGenError> {
    debug!("Sending prompt ({} bytes)", prompt.len());
    let completion = backend.complete(prompt).await?;
    debug!("Received completion ({} bytes)", completion.content.len());
    Ok(completion)
}

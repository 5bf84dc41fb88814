//! Configuration for a resume-to-website generation.
//!
//! All behaviour is controlled through [`GenerationConfig`], built via its
//! [`GenerationConfigBuilder`]. The defaults reproduce the fixed pipeline:
//! one call to `gemini-2.5-flash` at temperature 0.7 with the API key taken
//! from `GEMINI_API_KEY`.

use crate::error::SiteGenError;
use crate::pipeline::llm::CompletionBackend;
use crate::progress::ProgressCallback;
use std::fmt;
use std::sync::Arc;

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default provider name passed to `edgequake_llm::ProviderFactory`.
pub const DEFAULT_PROVIDER: &str = "gemini";

/// Environment variable holding the provider API key.
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Configuration for one generation.
///
/// # Example
/// ```rust
/// use resume2site::GenerationConfig;
///
/// let config = GenerationConfig::builder()
///     .model("gemini-2.5-pro")
///     .temperature(0.4)
///     .build()
///     .unwrap();
/// assert_eq!(config.model, "gemini-2.5-pro");
/// ```
#[derive(Clone)]
pub struct GenerationConfig {
    /// LLM model identifier. Default: `gemini-2.5-flash`.
    pub model: String,

    /// LLM provider name (e.g. "gemini", "openai"). Default: `gemini`.
    pub provider_name: String,

    /// Pre-constructed completion backend. Takes precedence over
    /// `provider_name` and skips the API key check.
    pub backend: Option<Arc<dyn CompletionBackend>>,

    /// Sampling temperature. Default: 0.7.
    ///
    /// Site generation is a creative task; the default leaves room for
    /// varied layouts and colour schemes between runs.
    pub temperature: f32,

    /// Cap on generated tokens. Default: provider default.
    pub max_tokens: Option<usize>,

    /// Name of the environment variable that must hold the API key.
    pub api_key_env: String,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Optional stage-progress observer.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            provider_name: DEFAULT_PROVIDER.to_string(),
            backend: None,
            temperature: 0.7,
            max_tokens: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("backend", &self.backend.as_ref().map(|_| "<dyn CompletionBackend>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_key_env", &self.api_key_env)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .finish()
    }
}

impl GenerationConfig {
    /// Create a new builder for `GenerationConfig`.
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`GenerationConfig`].
pub struct GenerationConfigBuilder {
    config: GenerationConfig,
}

impl GenerationConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = name.into();
        self
    }

    pub fn backend(mut self, backend: Arc<dyn CompletionBackend>) -> Self {
        self.config.backend = Some(backend);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = Some(n);
        self
    }

    pub fn api_key_env(mut self, var: impl Into<String>) -> Self {
        self.config.api_key_env = var.into();
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GenerationConfig, SiteGenError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(SiteGenError::InvalidConfig("Model must not be empty".into()));
        }
        if c.provider_name.trim().is_empty() {
            return Err(SiteGenError::InvalidConfig(
                "Provider name must not be empty".into(),
            ));
        }
        if c.api_key_env.trim().is_empty() {
            return Err(SiteGenError::InvalidConfig(
                "API key variable name must not be empty".into(),
            ));
        }
        if c.max_tokens == Some(0) {
            return Err(SiteGenError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        Ok(self.config)
    }
}

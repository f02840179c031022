//! Configuration types for a PDF analysis request.
//!
//! All per-request behaviour is controlled through [`AnalysisConfig`], built
//! via its [`AnalysisConfigBuilder`]. Keeping every knob in one plain struct
//! keeps the pipeline free of ambient state: the same config can be logged,
//! cloned across threads, and handed to tests with a stub provider.
//!
//! # Design choice: builder over constructor
//! Most callers only care about the provider and the mode. The builder lets
//! them set exactly that and rely on documented defaults for the rest.

use crate::error::AnalyzeError;
use crate::provider::{ClaudeModel, Provider, ProviderKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The output format selector: page-by-page description or narrated lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Detailed description of every page (default).
    #[default]
    Standard,
    /// Four-part narrated lesson in a teaching register.
    Discourse,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Standard => "standard",
            AnalysisMode::Discourse => "discourse",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Natural language the generated description is written in.
///
/// The reference deployment produced Italian output; the templates take the
/// language as a parameter so nothing else in the pipeline assumes a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputLanguage {
    /// Italian (default, matching the reference behaviour).
    #[default]
    Italian,
    /// English.
    English,
}

impl OutputLanguage {
    /// English name of the language, as interpolated into the prompt.
    pub fn name(&self) -> &'static str {
        match self {
            OutputLanguage::Italian => "Italian",
            OutputLanguage::English => "English",
        }
    }
}

/// Configuration for one PDF analysis request.
///
/// Built via [`AnalysisConfig::builder()`] or using
/// [`AnalysisConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf_descriptor::{AnalysisConfig, AnalysisMode, ClaudeModel};
///
/// let config = AnalysisConfig::builder()
///     .mode(AnalysisMode::Discourse)
///     .model(ClaudeModel::Haiku35)
///     .user_context("Focus on the safety chapter")
///     .api_key("sk-ant-…")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct AnalysisConfig {
    /// Which provider handles the request. Default: [`ProviderKind::Anthropic`].
    ///
    /// Anthropic accepts the PDF natively as a document attachment; OpenAI is
    /// text-only and receives the extracted text inside the prompt instead.
    pub provider_kind: ProviderKind,

    /// Claude model for the native-document path. Default: [`ClaudeModel::Sonnet4`].
    ///
    /// Ignored by the text-only provider, which uses a fixed model.
    pub model: ClaudeModel,

    /// Output format. Default: [`AnalysisMode::Standard`].
    pub mode: AnalysisMode,

    /// Language of the generated description. Default: Italian.
    pub language: OutputLanguage,

    /// Optional user-supplied context, woven into the narrative in discourse
    /// mode. Ignored in standard mode. Concatenated verbatim, never reworded.
    pub user_context: Option<String>,

    /// API credential for the selected provider, held only for this request.
    ///
    /// If `None`, the provider's environment variable (`ANTHROPIC_API_KEY` /
    /// `OPENAI_API_KEY`) is consulted at dispatch time. Never persisted.
    pub api_key: Option<String>,

    /// Per-call timeout for the outbound API request in seconds. Default: 120.
    ///
    /// A large document plus an 8k-token completion can take well over a
    /// minute; 120 s bounds the single suspension point without cutting off
    /// legitimate slow responses.
    pub api_timeout_secs: u64,

    /// Maximum tokens the model may generate. Default: 8192.
    pub max_output_tokens: usize,

    /// Pre-constructed provider. Takes precedence over `provider_kind`.
    ///
    /// The seam for tests and for callers that need custom middleware; the
    /// pipeline uses it as-is without constructing an HTTP client.
    pub provider: Option<Arc<dyn Provider>>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            provider_kind: ProviderKind::default(),
            model: ClaudeModel::default(),
            mode: AnalysisMode::default(),
            language: OutputLanguage::default(),
            user_context: None,
            api_key: None,
            api_timeout_secs: 120,
            max_output_tokens: 8192,
            provider: None,
        }
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("provider_kind", &self.provider_kind)
            .field("model", &self.model)
            .field("mode", &self.mode)
            .field("language", &self.language)
            .field("user_context", &self.user_context)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn Provider>"))
            .finish()
    }
}

impl AnalysisConfig {
    /// Create a new builder for `AnalysisConfig`.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`AnalysisConfig`].
#[derive(Debug)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn provider_kind(mut self, kind: ProviderKind) -> Self {
        self.config.provider_kind = kind;
        self
    }

    pub fn model(mut self, model: ClaudeModel) -> Self {
        self.config.model = model;
        self
    }

    pub fn mode(mut self, mode: AnalysisMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn language(mut self, language: OutputLanguage) -> Self {
        self.config.language = language;
        self
    }

    pub fn user_context(mut self, context: impl Into<String>) -> Self {
        self.config.user_context = Some(context.into());
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn max_output_tokens(mut self, n: usize) -> Self {
        self.config.max_output_tokens = n;
        self
    }

    pub fn provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalysisConfig, AnalyzeError> {
        let c = &self.config;
        if c.max_output_tokens == 0 {
            return Err(AnalyzeError::InvalidConfig(
                "max_output_tokens must be ≥ 1".into(),
            ));
        }
        if c.api_timeout_secs == 0 {
            return Err(AnalyzeError::InvalidConfig(
                "api_timeout_secs must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behaviour() {
        let c = AnalysisConfig::default();
        assert_eq!(c.provider_kind, ProviderKind::Anthropic);
        assert_eq!(c.mode, AnalysisMode::Standard);
        assert_eq!(c.language, OutputLanguage::Italian);
        assert_eq!(c.max_output_tokens, 8192);
        assert_eq!(c.api_timeout_secs, 120);
    }

    #[test]
    fn builder_clamps_timeout() {
        let c = AnalysisConfig::builder().api_timeout_secs(0).build().unwrap();
        assert_eq!(c.api_timeout_secs, 1);
    }

    #[test]
    fn debug_redacts_api_key() {
        let c = AnalysisConfig::builder().api_key("sk-secret").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("sk-secret"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn mode_round_trips_through_serde() {
        let json = serde_json::to_string(&AnalysisMode::Discourse).unwrap();
        assert_eq!(json, "\"discourse\"");
        let back: AnalysisMode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AnalysisMode::Discourse);
    }
}

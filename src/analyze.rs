//! Top-level analysis entry points.
//!
//! One request is a single linear pass — validate, build the prompt, make
//! exactly one provider call, package the result. The provider round-trip is
//! the sole suspension point; everything else is synchronous in-memory work.
//! Requests share no state, so independent callers can run concurrently
//! without any coordination here.

use crate::archive;
use crate::config::AnalysisConfig;
use crate::document::Document;
use crate::error::AnalyzeError;
use crate::estimate;
use crate::output::{self, AnalysisOutput, AnalysisResult};
use crate::prompts::build_prompt;
use crate::provider::{
    AnthropicProvider, GenerationRequest, OpenAiProvider, Provider, ProviderKind,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Analyse a PDF document and package the result for download.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// * Validation failures (size/page limits) block dispatch entirely.
/// * [`AnalyzeError::ParseFailed`] when the text-only provider is selected
///   and the PDF has no extractable text.
/// * [`AnalyzeError::RateLimited`] / [`AnalyzeError::Provider`] from the
///   remote call; never retried here.
///
/// No partial output: on any error the request produces no archive.
pub async fn analyze(
    document: &Document,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, AnalyzeError> {
    info!(
        "Starting analysis: '{}' ({} bytes, {:?} pages), provider={}, mode={}",
        document.name,
        document.size_bytes(),
        document.page_count,
        config.provider_kind,
        config.mode
    );

    // Limits gate both provider paths.
    document.validate()?;

    let native = config.provider_kind.is_native_document();
    let document_text = if native {
        None
    } else {
        Some(document.require_text()?)
    };

    let prompt = build_prompt(
        config.mode,
        config.language,
        document_text,
        config.user_context.as_deref(),
    );
    debug!("Built {}-char prompt", prompt.len());

    let provider = resolve_provider(config)?;
    let request = GenerationRequest {
        prompt,
        document: native.then(|| document.bytes.as_slice()),
    };

    let description = provider.generate(&request).await?;
    info!(
        "Analysis complete: {} chars from {}",
        description.len(),
        provider.name()
    );

    let result = AnalysisResult {
        description,
        provider: provider.name().to_string(),
        model: provider.model_tag().map(str::to_string),
        mode: config.mode,
    };

    let archive = archive::package(document, &result)?;
    let preview = output::preview(&result.description);
    let estimate = document.page_count.map(estimate::estimate);

    Ok(AnalysisOutput {
        result,
        archive,
        estimate,
        preview,
    })
}

/// Synchronous wrapper around [`analyze`].
///
/// Creates a temporary tokio runtime internally.
pub fn analyze_sync(
    document: &Document,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, AnalyzeError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| AnalyzeError::Internal(format!("failed to create tokio runtime: {e}")))?
        .block_on(analyze(document, config))
}

/// Resolve the provider, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`) — used as-is. The seam for
///    tests and for callers needing custom middleware.
/// 2. **Configured kind + key** — the API key comes from the config (held
///    per request, never persisted) or, failing that, the provider's
///    environment variable.
fn resolve_provider(config: &AnalysisConfig) -> Result<Arc<dyn Provider>, AnalyzeError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    let kind = config.provider_kind;
    let api_key = config
        .api_key
        .clone()
        .or_else(|| std::env::var(kind.api_key_env()).ok().filter(|k| !k.is_empty()))
        .ok_or_else(|| AnalyzeError::MissingApiKey {
            provider: kind.to_string(),
            hint: format!(
                "Set {} or supply a key on the config.",
                kind.api_key_env()
            ),
        })?;

    match kind {
        ProviderKind::Anthropic => Ok(Arc::new(AnthropicProvider::new(
            api_key,
            config.model,
            config.api_timeout_secs,
            config.max_output_tokens,
        )?)),
        ProviderKind::OpenAi => Ok(Arc::new(OpenAiProvider::new(
            api_key,
            config.api_timeout_secs,
            config.max_output_tokens,
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prebuilt_provider_wins_over_kind() {
        struct Canary;

        #[async_trait::async_trait]
        impl Provider for Canary {
            fn name(&self) -> &'static str {
                "canary"
            }
            fn model_tag(&self) -> Option<&'static str> {
                None
            }
            async fn generate(
                &self,
                _request: &GenerationRequest<'_>,
            ) -> Result<String, AnalyzeError> {
                Ok("ok".into())
            }
        }

        let config = AnalysisConfig::builder()
            .provider(Arc::new(Canary))
            .build()
            .unwrap();
        let provider = resolve_provider(&config).unwrap();
        assert_eq!(provider.name(), "canary");
    }
}

//! Provider dispatch: one trait, two remote backends.
//!
//! The two providers differ in capability, not in interface:
//!
//! * [`AnthropicProvider`] accepts the raw PDF natively as a base64 document
//!   attachment alongside the instruction text.
//! * [`OpenAiProvider`] is text-only; the extracted document text is already
//!   interpolated into the prompt before it gets here.
//!
//! Both implement [`Provider`], the seam the pipeline dispatches through.
//! Tests substitute their own implementation via
//! [`crate::config::AnalysisConfig::provider`], so no HTTP server is needed
//! to exercise the orchestration.
//!
//! Exactly one outbound call is made per request. There is no retry,
//! backoff, streaming, or fan-out; a call either yields the complete
//! description or an [`AnalyzeError`].

use crate::error::AnalyzeError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub mod anthropic;
pub mod openai;

pub use anthropic::{AnthropicProvider, ClaudeModel};
pub use openai::OpenAiProvider;

/// Which remote backend handles a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Anthropic Messages API with native PDF support (default).
    #[default]
    Anthropic,
    /// OpenAI Chat Completions, text-only.
    OpenAi,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAi => "openai",
        }
    }

    /// Whether this backend accepts the PDF bytes directly as an attachment.
    pub fn is_native_document(&self) -> bool {
        matches!(self, ProviderKind::Anthropic)
    }

    /// Environment variable consulted when no API key is on the config.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The prepared payload for one `generate` call.
///
/// `document` is `Some` only on the native-document path; text-only
/// providers receive everything they need inside `prompt` and must ignore
/// the field.
#[derive(Debug)]
pub struct GenerationRequest<'a> {
    /// The full instruction text from the prompt builder.
    pub prompt: String,
    /// Raw PDF bytes for providers with native document support.
    pub document: Option<&'a [u8]>,
}

/// A remote model endpoint that turns a prepared payload into a description.
///
/// Implementations perform exactly one outbound call with no local side
/// effects, and map HTTP 429 to [`AnalyzeError::RateLimited`] and every
/// other failure to [`AnalyzeError::Provider`].
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short provider name used in archive entry names, e.g. `"anthropic"`.
    fn name(&self) -> &'static str;

    /// Filename-safe model tag, e.g. `"sonnet4"`, when a model is known.
    fn model_tag(&self) -> Option<&'static str>;

    /// Send the payload and return the generated description.
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, AnalyzeError>;
}

/// Build the shared HTTP client with the bounded per-call timeout.
///
/// The remote round-trip is the sole suspension point of a request; an
/// explicit timeout keeps it bounded instead of inheriting whatever the
/// transport defaults to.
pub(crate) fn http_client(
    provider: &'static str,
    timeout_secs: u64,
) -> Result<reqwest::Client, AnalyzeError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AnalyzeError::Provider {
            provider: provider.to_string(),
            message: format!("failed to build HTTP client: {e}"),
        })
}

/// Map a non-success HTTP status to the error taxonomy.
///
/// 429 is kept distinct; everything else collapses into
/// [`AnalyzeError::Provider`] with the response body attached verbatim.
pub(crate) fn error_for_status(
    provider: &'static str,
    status: reqwest::StatusCode,
    retry_after_secs: Option<u64>,
    body: &str,
) -> AnalyzeError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        AnalyzeError::RateLimited {
            provider: provider.to_string(),
            retry_after_secs,
        }
    } else {
        AnalyzeError::Provider {
            provider: provider.to_string(),
            message: format!("HTTP {}: {}", status.as_u16(), body.trim()),
        }
    }
}

/// Parse a `Retry-After` header value in seconds, when present.
pub(crate) fn retry_after_secs(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_as_str() {
        assert_eq!(ProviderKind::Anthropic.as_str(), "anthropic");
        assert_eq!(ProviderKind::OpenAi.as_str(), "openai");
    }

    #[test]
    fn only_anthropic_is_native() {
        assert!(ProviderKind::Anthropic.is_native_document());
        assert!(!ProviderKind::OpenAi.is_native_document());
    }

    #[test]
    fn status_429_maps_to_rate_limited() {
        let err = error_for_status(
            "anthropic",
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            Some(30),
            "{\"error\":\"overloaded\"}",
        );
        assert!(matches!(
            err,
            AnalyzeError::RateLimited {
                retry_after_secs: Some(30),
                ..
            }
        ));
    }

    #[test]
    fn other_statuses_map_to_provider_error_with_body() {
        let err = error_for_status(
            "openai",
            reqwest::StatusCode::UNAUTHORIZED,
            None,
            "invalid key",
        );
        match err {
            AnalyzeError::Provider { message, .. } => {
                assert!(message.contains("401"));
                assert!(message.contains("invalid key"));
            }
            other => panic!("expected Provider error, got {other:?}"),
        }
    }
}

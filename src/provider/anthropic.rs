//! Native-document provider: the Anthropic Messages API.
//!
//! The PDF is sent as-is — base64-encoded into a `document` content block
//! with MIME type `application/pdf` — alongside a `text` block carrying the
//! instruction. No rasterisation or extraction happens on our side; the
//! provider reads both the text layer and the page images itself. This is
//! why the 32 MiB / 100-page limits in [`crate::document`] exist: they are
//! this API's own bounds, enforced locally for a better error message.
//!
//! The first `text` segment of the response is the description. Responses
//! without one (e.g. a refusal consisting only of tool blocks) are reported
//! as a provider error rather than returned as an empty description.

use super::{error_for_status, http_client, retry_after_secs, GenerationRequest, Provider};
use crate::error::AnalyzeError;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

/// Messages API endpoint.
pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// API version header required by the Messages API.
const ANTHROPIC_VERSION: &str = "2023-06-01";

const PROVIDER_NAME: &str = "anthropic";

/// The five Claude models offered for native PDF analysis.
///
/// A static label-to-identifier table: the friendly label is what a UI
/// shows, the tag is the filename-safe key used in archive entry names, and
/// the id is what goes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClaudeModel {
    /// Best balance of performance and cost (default).
    #[default]
    Sonnet4,
    /// Most capable, most expensive.
    Opus4,
    Sonnet37,
    Sonnet35,
    /// Fastest and cheapest.
    Haiku35,
}

impl ClaudeModel {
    /// All selectable models, in recommendation order.
    pub const ALL: [ClaudeModel; 5] = [
        ClaudeModel::Sonnet4,
        ClaudeModel::Opus4,
        ClaudeModel::Sonnet37,
        ClaudeModel::Sonnet35,
        ClaudeModel::Haiku35,
    ];

    /// Wire identifier sent to the API.
    pub fn id(&self) -> &'static str {
        match self {
            ClaudeModel::Sonnet4 => "claude-sonnet-4-20250514",
            ClaudeModel::Opus4 => "claude-opus-4-20250514",
            ClaudeModel::Sonnet37 => "claude-3-7-sonnet-20250219",
            ClaudeModel::Sonnet35 => "claude-3-5-sonnet-20241022",
            ClaudeModel::Haiku35 => "claude-3-5-haiku-20241022",
        }
    }

    /// Filename-safe short tag used in archive entry names.
    pub fn tag(&self) -> &'static str {
        match self {
            ClaudeModel::Sonnet4 => "sonnet4",
            ClaudeModel::Opus4 => "opus4",
            ClaudeModel::Sonnet37 => "sonnet3.7",
            ClaudeModel::Sonnet35 => "sonnet3.5",
            ClaudeModel::Haiku35 => "haiku3.5",
        }
    }

    /// Human-facing label with the selection hint.
    pub fn label(&self) -> &'static str {
        match self {
            ClaudeModel::Sonnet4 => "Claude Sonnet 4 (Recommended)",
            ClaudeModel::Opus4 => "Claude Opus 4 (Most Powerful)",
            ClaudeModel::Sonnet37 => "Claude Sonnet 3.7",
            ClaudeModel::Sonnet35 => "Claude 3.5 Sonnet",
            ClaudeModel::Haiku35 => "Claude 3.5 Haiku (Fastest & Cheapest)",
        }
    }

    /// Look a model up by its short tag, e.g. from a CLI flag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.tag() == tag)
    }
}

/// Provider with native PDF support via the Anthropic Messages API.
pub struct AnthropicProvider {
    api_key: String,
    model: ClaudeModel,
    max_tokens: usize,
    client: reqwest::Client,
    base_url: String,
}

impl AnthropicProvider {
    /// Create a provider with a bounded per-call timeout.
    pub fn new(
        api_key: impl Into<String>,
        model: ClaudeModel,
        timeout_secs: u64,
        max_tokens: usize,
    ) -> Result<Self, AnalyzeError> {
        Ok(Self {
            api_key: api_key.into(),
            model,
            max_tokens,
            client: http_client(PROVIDER_NAME, timeout_secs)?,
            base_url: ANTHROPIC_API_URL.to_string(),
        })
    }

    /// Override the endpoint, e.g. for a gateway or a test server.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Selected model.
    pub fn model(&self) -> ClaudeModel {
        self.model
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn model_tag(&self) -> Option<&'static str> {
        Some(self.model.tag())
    }

    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, AnalyzeError> {
        let document = request.document.ok_or_else(|| {
            AnalyzeError::Internal(
                "native-document provider called without document bytes".into(),
            )
        })?;

        let body = request_body(self.model, self.max_tokens, &request.prompt, document);
        debug!(
            "Anthropic request: model={}, document={} bytes, prompt={} chars",
            self.model.id(),
            document.len(),
            request.prompt.len()
        );

        let response = self
            .client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalyzeError::Provider {
                provider: PROVIDER_NAME.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let retry_after = retry_after_secs(response.headers());
        let text = response.text().await.map_err(|e| AnalyzeError::Provider {
            provider: PROVIDER_NAME.to_string(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(error_for_status(PROVIDER_NAME, status, retry_after, &text));
        }

        first_text_segment(&text)
    }
}

/// Build the Messages API request body: one user turn with a base64
/// `document` block followed by a `text` block.
fn request_body(
    model: ClaudeModel,
    max_tokens: usize,
    prompt: &str,
    document: &[u8],
) -> serde_json::Value {
    json!({
        "model": model.id(),
        "max_tokens": max_tokens,
        "messages": [{
            "role": "user",
            "content": [
                {
                    "type": "document",
                    "source": {
                        "type": "base64",
                        "media_type": "application/pdf",
                        "data": STANDARD.encode(document),
                    }
                },
                {
                    "type": "text",
                    "text": prompt,
                }
            ]
        }]
    })
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

/// Extract the first `text` segment from a Messages API response body.
fn first_text_segment(body: &str) -> Result<String, AnalyzeError> {
    let parsed: MessagesResponse =
        serde_json::from_str(body).map_err(|e| AnalyzeError::Provider {
            provider: PROVIDER_NAME.to_string(),
            message: format!("unexpected response body: {e}"),
        })?;

    parsed
        .content
        .into_iter()
        .find(|block| block.kind == "text" && !block.text.is_empty())
        .map(|block| block.text)
        .ok_or_else(|| AnalyzeError::Provider {
            provider: PROVIDER_NAME.to_string(),
            message: "response contained no text segment".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_table_is_consistent() {
        for model in ClaudeModel::ALL {
            assert!(model.id().starts_with("claude-"), "id: {}", model.id());
            assert_eq!(ClaudeModel::from_tag(model.tag()), Some(model));
        }
        assert_eq!(ClaudeModel::from_tag("gpt4o"), None);
        assert_eq!(ClaudeModel::default(), ClaudeModel::Sonnet4);
    }

    #[test]
    fn request_body_has_document_and_text_blocks() {
        let body = request_body(ClaudeModel::Haiku35, 8192, "describe this", b"%PDF-1.4");
        assert_eq!(body["model"], "claude-3-5-haiku-20241022");
        assert_eq!(body["max_tokens"], 8192);

        let content = body["messages"][0]["content"].as_array().unwrap();
        assert_eq!(content.len(), 2);
        assert_eq!(content[0]["type"], "document");
        assert_eq!(content[0]["source"]["media_type"], "application/pdf");
        assert_eq!(
            content[0]["source"]["data"],
            STANDARD.encode(b"%PDF-1.4")
        );
        assert_eq!(content[1]["type"], "text");
        assert_eq!(content[1]["text"], "describe this");
    }

    #[test]
    fn first_text_segment_picks_first_text_block() {
        let body = r#"{"content":[
            {"type":"thinking","text":""},
            {"type":"text","text":"The description."},
            {"type":"text","text":"ignored"}
        ]}"#;
        assert_eq!(first_text_segment(body).unwrap(), "The description.");
    }

    #[test]
    fn response_without_text_is_an_error() {
        let err = first_text_segment(r#"{"content":[]}"#).unwrap_err();
        assert!(matches!(err, AnalyzeError::Provider { .. }));
        let err = first_text_segment("not json").unwrap_err();
        assert!(matches!(err, AnalyzeError::Provider { .. }));
    }
}

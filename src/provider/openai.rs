//! Text-only provider: the OpenAI Chat Completions API.
//!
//! No document attachment: the caller interpolates the extracted PDF text
//! into the prompt before dispatch, so this provider sends a single user
//! message and returns the completion text. The model is fixed — there is
//! exactly one text-only model on offer, matching the reference behaviour.

use super::{error_for_status, http_client, retry_after_secs, GenerationRequest, Provider};
use crate::error::AnalyzeError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Chat Completions endpoint.
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// The fixed model for the text-only path.
pub const OPENAI_MODEL: &str = "gpt-4o";

const PROVIDER_NAME: &str = "openai";
const MODEL_TAG: &str = "gpt4o";

/// Text-only provider backed by OpenAI Chat Completions.
pub struct OpenAiProvider {
    api_key: String,
    max_tokens: usize,
    client: reqwest::Client,
    base_url: String,
}

impl OpenAiProvider {
    /// Create a provider with a bounded per-call timeout.
    pub fn new(
        api_key: impl Into<String>,
        timeout_secs: u64,
        max_tokens: usize,
    ) -> Result<Self, AnalyzeError> {
        Ok(Self {
            api_key: api_key.into(),
            max_tokens,
            client: http_client(PROVIDER_NAME, timeout_secs)?,
            base_url: OPENAI_API_URL.to_string(),
        })
    }

    /// Override the endpoint, e.g. for a gateway or a test server.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn model_tag(&self) -> Option<&'static str> {
        Some(MODEL_TAG)
    }

    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, AnalyzeError> {
        // `request.document` is ignored: a text-only provider receives the
        // extracted text inside the prompt.
        let body = request_body(self.max_tokens, &request.prompt);
        debug!(
            "OpenAI request: model={}, prompt={} chars",
            OPENAI_MODEL,
            request.prompt.len()
        );

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
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

        completion_text(&text)
    }
}

/// Build the Chat Completions request body: one user message.
fn request_body(max_tokens: usize, prompt: &str) -> serde_json::Value {
    json!({
        "model": OPENAI_MODEL,
        "max_tokens": max_tokens,
        "messages": [{
            "role": "user",
            "content": prompt,
        }]
    })
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Extract the completion text from a Chat Completions response body.
fn completion_text(body: &str) -> Result<String, AnalyzeError> {
    let parsed: ChatResponse = serde_json::from_str(body).map_err(|e| AnalyzeError::Provider {
        provider: PROVIDER_NAME.to_string(),
        message: format!("unexpected response body: {e}"),
    })?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AnalyzeError::Provider {
            provider: PROVIDER_NAME.to_string(),
            message: "response contained no completion text".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_is_single_user_message() {
        let body = request_body(8192, "describe this text");
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_tokens"], 8192);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "describe this text");
    }

    #[test]
    fn completion_text_reads_first_choice() {
        let body = r#"{"choices":[{"message":{"content":"A summary."}}]}"#;
        assert_eq!(completion_text(body).unwrap(), "A summary.");
    }

    #[test]
    fn empty_or_missing_content_is_an_error() {
        for body in [
            r#"{"choices":[]}"#,
            r#"{"choices":[{"message":{"content":null}}]}"#,
            r#"{"choices":[{"message":{"content":""}}]}"#,
        ] {
            let err = completion_text(body).unwrap_err();
            assert!(matches!(err, AnalyzeError::Provider { .. }), "body: {body}");
        }
    }
}

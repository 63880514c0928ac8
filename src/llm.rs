//! Client for an OpenAI-compatible chat-completion API.

use crate::error::ApiError;
use crate::types::{ChatMessage, ChatReply};
use crate::upstream::{endpoint, UpstreamReply};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

#[derive(Serialize, Debug)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    presence_penalty: f64,
    frequency_penalty: f64,
}

/// The parts of a chat-completion response we read.
///
/// Everything is optional and loosely typed; gaps are filled in by
/// [`reply_from_completion`] rather than failing the request.
#[derive(Deserialize, Debug, Default)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Option<Vec<CompletionChoice>>,
}

#[derive(Deserialize, Debug, Default)]
pub struct CompletionChoice {
    #[serde(default)]
    pub message: Option<CompletionMessage>,
}

#[derive(Deserialize, Debug, Default)]
pub struct CompletionMessage {
    #[serde(default)]
    pub role: Option<Value>,
    #[serde(default)]
    pub content: Option<Value>,
}

/// Reduce a completion to the first choice's role and content.
///
/// Role falls back to `"assistant"` when missing, empty or not a string;
/// content falls back to `""` when missing or not a string.
pub fn reply_from_completion(resp: CompletionResponse) -> ChatReply {
    let message = resp
        .choices
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .unwrap_or_default();

    let role = message.role.as_ref().and_then(Value::as_str).unwrap_or_default();
    let content = message.content.as_ref().and_then(Value::as_str).unwrap_or_default();

    ChatReply {
        role: if role.is_empty() { "assistant" } else { role }.to_string(),
        content: content.to_string(),
    }
}

#[derive(Clone, Debug)]
pub struct LlmClient {
    client: Client,
    base_url: Url,
    model: String,
}

impl LlmClient {
    pub fn new(client: Client, base_url: Url, model: String) -> Self {
        Self {
            client,
            base_url,
            model,
        }
    }

    /// POST the conversation to `{base}/chat/completions`.
    ///
    /// A non-success status is returned as [`ApiError::Upstream`] carrying the
    /// provider's own status code.
    pub async fn complete(
        &self,
        api_key: &str,
        messages: &[ChatMessage],
        temperature: f64,
    ) -> Result<ChatReply, ApiError> {
        let url = endpoint(&self.base_url, &["chat", "completions"])?;
        let body = CompletionRequest {
            model: &self.model,
            messages,
            temperature,
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
        };

        debug!(
            model = %self.model,
            history_len = messages.len(),
            temperature,
            "forwarding chat request"
        );

        let resp = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let reply = UpstreamReply::read(resp).await?;
        if !reply.status.is_success() {
            return Err(ApiError::Upstream {
                status: reply.status,
                message: reply.error_message(),
            });
        }

        let body = reply
            .body
            .ok_or_else(|| ApiError::Internal("chat provider returned a non-JSON body".into()))?;
        let completion: CompletionResponse = serde_json::from_value(body)?;
        Ok(reply_from_completion(completion))
    }
}

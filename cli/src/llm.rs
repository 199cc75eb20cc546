use common::config::LlmConfig;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcomes of one completion attempt. Only `RateLimited` is retryable; the
/// retry loop switches on the variant instead of inspecting transport errors.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("rate limited: {message}")]
    RateLimited { message: String },

    #[error("completion request failed with status {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("completion response contained no choices")]
    EmptyChoices,
}

/// Seam for the completion call so the retry controller and the run flow can
/// be exercised against a scripted backend without network access.
pub trait Completion {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl LlmClient {
    pub fn new(config: &LlmConfig, api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Completion for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self.client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        let reply: ChatResponse = response.json().await?;
        reply
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(CompletionError::EmptyChoices)
    }
}

// 429 is the only signal treated as retryable.
fn classify_failure(status: StatusCode, body: &str) -> CompletionError {
    let message = error_message(body);
    if status == StatusCode::TOO_MANY_REQUESTS {
        CompletionError::RateLimited { message }
    } else {
        CompletionError::Api { status, message }
    }
}

// OpenAI-compatible error envelope: {"error": {"message": "..."}}. Falls back
// to the raw body when the envelope is absent.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

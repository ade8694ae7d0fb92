//! LLM Client — the single point of entry for all Groq API calls.
//!
//! ARCHITECTURAL RULE: No other module may call the completion endpoint
//! directly. All LLM interactions MUST go through this module.
//!
//! Each call is exactly one attempt: a failed request is a per-document
//! failure for the caller to record, not something to retry here.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
/// The model used for all screening calls.
/// Intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "qwen-qwq-32b";
const TEMPERATURE: f32 = 0.6;
const MAX_COMPLETION_TOKENS: u32 = 4096;
const TOP_P: f32 = 0.95;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_completion_tokens: u32,
    top_p: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

impl ChatResponse {
    /// Extracts the trimmed text of the first completion choice.
    fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The single LLM client shared by all screening tasks.
/// Wraps the Groq chat-completions API (OpenAI-compatible wire format).
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Sends one user-role message and returns the first choice's text.
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_completion_tokens: MAX_COMPLETION_TOKENS,
            top_p: TOP_P,
            stream: false,
        };

        let response = self
            .client
            .post(GROQ_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse the endpoint's error message
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatResponse = response.json().await?;

        if let Some(usage) = &completion.usage {
            debug!(
                "completion received: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        let text = completion.text().ok_or(LlmError::EmptyContent)?;
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_matches_endpoint_contract() {
        let request = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: "analyze this",
            }],
            temperature: TEMPERATURE,
            max_completion_tokens: MAX_COMPLETION_TOKENS,
            top_p: TOP_P,
            stream: false,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "qwen-qwq-32b");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "analyze this");
        assert_eq!(value["stream"], false);
        assert_eq!(value["max_completion_tokens"], 4096);
        assert!((value["temperature"].as_f64().unwrap() - 0.6).abs() < 1e-6);
        assert!((value["top_p"].as_f64().unwrap() - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_response_text_takes_first_choice() {
        let json = r#"{
            "choices": [
                {"message": {"content": "  1. Candidate Name: Jane Doe  "}},
                {"message": {"content": "ignored"}}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5}
        }"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), Some("1. Candidate Name: Jane Doe"));
    }

    #[test]
    fn test_response_text_empty_choices_is_none() {
        let json = r#"{"choices": []}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), None);
    }

    #[test]
    fn test_response_text_blank_content_is_none() {
        let json = r#"{"choices": [{"message": {"content": "   "}}]}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), None);
    }
}

//! LLM Client: the single point of entry for all text-generation calls in JobScout.
//!
//! ARCHITECTURAL RULE: No other module may call the Groq API directly.
//! Pipeline stages depend on the `Gateway` trait; `LlmClient` is its production implementation.
//!
//! Model: llama-3.3-70b-versatile (hardcoded, do not make configurable to prevent drift)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

#[cfg(test)]
pub mod fake;
pub mod prompts;

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
/// The model used for all LLM calls in JobScout.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "llama-3.3-70b-versatile";
const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 4096;
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// True when the service answered but its content was not usable JSON.
    /// Everything else means the call itself failed.
    pub fn is_malformed_output(&self) -> bool {
        matches!(self, LlmError::Parse(_) | LlmError::EmptyContent)
    }
}

/// The top-level JSON shape a caller expects back from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    Object,
    Array,
}

impl ResponseShape {
    fn system_prompt(self) -> &'static str {
        match self {
            ResponseShape::Object => prompts::JSON_OBJECT_SYSTEM,
            ResponseShape::Array => prompts::JSON_ARRAY_SYSTEM,
        }
    }
}

/// The text-generation boundary consumed by the recommendation pipeline.
///
/// Implementations return the parsed JSON value of the model's answer and do no
/// schema validation beyond parseability. Carried as `Arc<dyn Gateway>`.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn generate(&self, prompt: &str, shape: ResponseShape) -> Result<Value, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Extracts the text content of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct GroqError {
    error: GroqErrorBody,
}

#[derive(Debug, Deserialize)]
struct GroqErrorBody {
    message: String,
}

/// The single LLM client used by the pipeline.
/// Wraps the Groq chat completions API with retry logic and JSON parsing.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, api_key })
    }

    /// Makes a raw call to the chat completions API, returning the full response object.
    /// Retries on 429 (rate limit), 5xx and transport errors with exponential backoff.
    pub async fn call(
        &self,
        prompt: &str,
        shape: ResponseShape,
    ) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: shape.system_prompt(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            // JSON mode only ever produces objects, so arrays rely on the prompt alone.
            response_format: match shape {
                ResponseShape::Object => Some(ResponseFormat {
                    format_type: "json_object",
                }),
                ResponseShape::Array => None,
            },
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(GROQ_API_URL)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(if status.as_u16() == 429 {
                    LlmError::RateLimited {
                        retries: attempt + 1,
                    }
                } else {
                    LlmError::Api {
                        status: status.as_u16(),
                        message: body,
                    }
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<GroqError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let chat_response: ChatResponse = response.json().await?;

            if let Some(usage) = &chat_response.usage {
                debug!(
                    "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                    usage.prompt_tokens, usage.completion_tokens
                );
            }

            return Ok(chat_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl Gateway for LlmClient {
    async fn generate(&self, prompt: &str, shape: ResponseShape) -> Result<Value, LlmError> {
        let response = self.call(prompt, shape).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        parse_json_text(text)
    }
}

/// Parses model output as JSON.
///
/// Tries the whole reply (fences stripped) first, then a fenced block found
/// anywhere in the reply, then the span from the first `[`/`{` to the last
/// matching `]`/`}`. The first parse error is returned if all three fail.
fn parse_json_text(text: &str) -> Result<Value, LlmError> {
    let first_error = match serde_json::from_str::<Value>(strip_json_fences(text)) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    find_fenced_block(text)
        .into_iter()
        .chain(outer_json_span(text))
        .find_map(|candidate| serde_json::from_str::<Value>(candidate).ok())
        .ok_or(LlmError::Parse(first_error))
}

/// Body of the first ``` fenced block, wherever it sits in the reply.
fn find_fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")? + 3;
    let after = &text[start..];
    let body = after.strip_prefix("json").unwrap_or(after);
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// From the first `[` or `{` to the last bracket of the same kind.
fn outer_json_span(text: &str) -> Option<&str> {
    let start = text.find(['[', '{'])?;
    let close = if text[start..].starts_with('[') { ']' } else { '}' };
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n[{\"title\": \"Clerk\"}]\n```";
        assert_eq!(strip_json_fences(input), "[{\"title\": \"Clerk\"}]");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"skills\": []}\n```";
        assert_eq!(strip_json_fences(input), "{\"skills\": []}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  {\"skills\": []}  ";
        assert_eq!(strip_json_fences(input), "{\"skills\": []}");
    }

    #[test]
    fn test_parse_json_text_accepts_fenced_array() {
        let value = parse_json_text("```json\n[1, 2]\n```").unwrap();
        assert_eq!(value, json!([1, 2]));
    }

    #[test]
    fn test_parse_json_text_finds_fenced_block_after_prose() {
        let reply = "Here are 2 jobs for you:\n```json\n[{\"title\": \"Clerk\"}, {\"title\": \"Peon\"}]\n```\nGood luck!";
        let value = parse_json_text(reply).unwrap();
        assert_eq!(value, json!([{"title": "Clerk"}, {"title": "Peon"}]));
    }

    #[test]
    fn test_parse_json_text_ignores_trailing_prose() {
        let reply = "[{\"title\": \"Clerk\"}]\n\nLet me know if you need more.";
        let value = parse_json_text(reply).unwrap();
        assert_eq!(value, json!([{"title": "Clerk"}]));
    }

    #[test]
    fn test_parse_json_text_takes_outer_span_between_prose() {
        let reply = "Sure! {\"skills\": [\"tally\"]} Hope this helps.";
        let value = parse_json_text(reply).unwrap();
        assert_eq!(value, json!({"skills": ["tally"]}));
    }

    #[test]
    fn test_outer_json_span_matches_opening_bracket_kind() {
        assert_eq!(outer_json_span("jobs: [1, {\"a\": 2}] done"), Some("[1, {\"a\": 2}]"));
        assert_eq!(outer_json_span("no json here"), None);
        assert_eq!(outer_json_span("] backwards ["), None);
    }

    #[test]
    fn test_parse_json_text_rejects_prose() {
        let err = parse_json_text("Here are some jobs for you!").unwrap_err();
        assert!(err.is_malformed_output());
    }

    #[test]
    fn test_transport_errors_are_not_malformed_output() {
        let err = LlmError::Api {
            status: 401,
            message: "Invalid API Key".to_string(),
        };
        assert!(!err.is_malformed_output());
        assert!(!LlmError::RateLimited { retries: 3 }.is_malformed_output());
        assert!(LlmError::EmptyContent.is_malformed_output());
    }

    #[test]
    fn test_object_request_enables_json_mode() {
        let request = ChatRequest {
            model: MODEL,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            messages: vec![],
            response_format: Some(ResponseFormat {
                format_type: "json_object",
            }),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["response_format"]["type"], "json_object");
        assert_eq!(value["model"], "llama-3.3-70b-versatile");
    }

    #[test]
    fn test_array_request_omits_response_format() {
        let request = ChatRequest {
            model: MODEL,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            messages: vec![],
            response_format: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("response_format").is_none());
    }

    #[test]
    fn test_chat_response_text_reads_first_choice() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "{\"a\": 1}"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }))
        .unwrap();
        assert_eq!(response.text(), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_chat_response_blank_content_is_none() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": "   "}}]
        }))
        .unwrap();
        assert_eq!(response.text(), None);
    }
}

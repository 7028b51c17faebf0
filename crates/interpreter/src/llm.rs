use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::InterpretError;
use crate::fallback::Interpreter;
use crate::input::QuoteInput;

const SYSTEM_PROMPT: &str = r#"Convert the user's shipping request into one JSON object with this shape:
{
  "from": {"country": "ISO2", "postal": "string, optional"},
  "to": {"country": "ISO2", "postal": "string, optional"},
  "parcel": {"weight_kg": number, "l_cm": number, "w_cm": number, "h_cm": number},
  "options": {"priority": boolean},
  "currency": "KRW | USD | JPY | ...",
  "max_wait_ms": number
}
Unspecified dimensions are l_cm=30, w_cm=20, h_cm=15. Unspecified currency is KRW, max_wait_ms is 1200.
한국, 대한민국 and 서울 mean KR. 미국, 샌프란시스코 and USA mean US.
Requests for fast or urgent delivery set options.priority to true.
Answer with the JSON object only."#;

/// Settings for an OpenAI-compatible chat completion endpoint.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    /// Base URL up to and including the API version, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    /// Total tries, including the first.
    pub attempts: u32,
    /// Pause after a failed request before the next try.
    pub retry_delay: Duration,
    pub request_timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.1,
            attempts: 2,
            retry_delay: Duration::from_millis(300),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Model-backed interpretation over `POST {base_url}/chat/completions`.
#[derive(Debug, Clone)]
pub struct LlmInterpreter {
    http: reqwest::Client,
    config: LlmConfig,
}

impl LlmInterpreter {
    pub fn new(config: LlmConfig) -> Result<Self, InterpretError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| InterpretError::Llm(e.to_string()))?;
        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    async fn complete(&self, utterance: &str) -> Result<String, InterpretError> {
        let user = format!("Utterance: {utterance}");
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: self.config.temperature,
        };

        let mut builder = self.http.post(self.endpoint()).json(&request);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| InterpretError::Llm(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InterpretError::Llm(format!("{status}: {body}")));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| InterpretError::Llm(format!("decode completion: {e}")))?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(InterpretError::NoChoices)
    }
}

#[async_trait]
impl Interpreter for LlmInterpreter {
    async fn interpret(&self, utterance: &str) -> Result<QuoteInput, InterpretError> {
        let mut last = InterpretError::NoChoices;
        for attempt in 1..=self.config.attempts.max(1) {
            match self.complete(utterance).await {
                Ok(content) => match parse_content(&content) {
                    Ok(input) => return Ok(input),
                    Err(e) => last = e,
                },
                Err(e) => {
                    last = e;
                    if attempt < self.config.attempts {
                        tokio::time::sleep(self.config.retry_delay).await;
                    }
                }
            }
            tracing::debug!(attempt, error = %last, "llm interpretation attempt failed");
        }
        Err(last)
    }
}

fn parse_content(content: &str) -> Result<QuoteInput, InterpretError> {
    let content = strip_code_fence(content);
    let input: QuoteInput =
        serde_json::from_str(content).map_err(|e| InterpretError::Parse(e.to_string()))?;
    input.normalize()
}

/// Models sometimes wrap JSON in a markdown fence despite being told not to.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map_or(trimmed, str::trim)
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    response_format: ResponseFormat,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: String,
}

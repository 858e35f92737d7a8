use std::time::Duration;

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::{
    config::PlannerConfig,
    error::{PlannerError, Result},
};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// OpenAI-compatible chat-completions client returning the raw response text.
///
/// There is no retry loop; a failed call is reported once and the caller
/// decides what to do with it.
#[derive(Clone, Debug)]
pub struct ModelClient {
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: Option<u32>,
    timeout: Duration,
}

impl ModelClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            max_tokens: None,
            timeout: Duration::from_secs(120),
        }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(config.api_key.clone(), config.model.clone())
            .with_base_url(config.base_url.clone())
            .with_timeout(config.timeout)
            .with_max_tokens(config.max_tokens)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one user prompt and return the text of the first choice.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let body = ChatCompletionRequest::new(&self.model, vec![user_message(prompt)])
            .with_max_tokens(self.max_tokens)
            .into_value();

        let response_json = self.chat_completion(&body).await?;
        let text = extract_response_text(&response_json).ok_or_else(|| {
            PlannerError::Transport("model response did not contain any text".to_string())
        })?;

        debug!(
            target: "tripplanner::client",
            model = %self.model,
            chars = text.len(),
            "Received model response"
        );
        Ok(text)
    }

    async fn chat_completion(&self, body: &Value) -> Result<Value> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| PlannerError::Transport(format!("Failed to build HTTP client: {err}")))?;

        let request_url = build_chat_url(&self.base_url);
        let response = client
            .post(&request_url)
            .bearer_auth(&self.api_key)
            .header("X-Title", "trip-planner-rs")
            .json(body)
            .send()
            .await
            .map_err(|err| PlannerError::Transport(format!("HTTP request failed: {err}")))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|err| PlannerError::Transport(format!("Failed to read response: {err}")))?;

        if !status.is_success() {
            let api_message = serde_json::from_str::<Value>(&response_text)
                .ok()
                .and_then(|body| api_error_message(&body))
                .unwrap_or(response_text);

            warn!(
                target: "tripplanner::client",
                status = status.as_u16(),
                "Model provider returned an error status"
            );
            return Err(PlannerError::Transport(format!(
                "HTTP {} error: {}",
                status, api_message
            )));
        }

        let response_json: Value = serde_json::from_str(&response_text)
            .map_err(|err| PlannerError::Transport(format!("Failed to parse JSON: {err}")))?;

        if let Some(message) = api_error_message(&response_json) {
            return Err(PlannerError::Transport(format!("API error: {}", message)));
        }

        Ok(response_json)
    }
}

fn user_message(prompt: &str) -> Value {
    json!({
        "role": "user",
        "content": prompt
    })
}

fn api_error_message(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    if error.is_null() {
        return None;
    }
    Some(
        error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
    )
}

/// Text of the first choice, for OpenAI-style and Gemini-style response bodies.
pub fn extract_response_text(body: &Value) -> Option<String> {
    let openai = body
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str);
    let gemini = || {
        body.pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
    };

    openai
        .or_else(gemini)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}

fn build_chat_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

#[derive(Clone, Debug)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Value>,
    max_tokens: Option<u32>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Value>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn into_value(self) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": self.messages,
        });

        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        body
    }
}

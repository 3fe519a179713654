// src/llm.rs
//
// Chat-completion client. The pipeline runs on a plain worker thread, so the
// client is blocking.

use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    config::{consts::*, options::EnvSettings},
    error::LlmError,
};

/// One system+user exchange returning the assistant's text.
pub trait Llm: Send + Sync {
    fn complete(&self, system: &str, user: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [Message<'a>; 2],
}

#[derive(Debug, Clone, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponseRaw {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAiClient {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(LLM_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Config(e.to_string()))?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            temperature: LLM_TEMPERATURE,
        })
    }

    pub fn from_settings(env: &EnvSettings) -> Result<Self, LlmError> {
        let key = env
            .api_key
            .clone()
            .ok_or_else(|| LlmError::Config(format!("{ENV_API_KEY} not set")))?;
        Self::new(key, env.base_url.clone(), env.model.clone())
    }
}

impl Llm for OpenAiClient {
    fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let start = Instant::now();
        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: [
                Message { role: "system", content: system },
                Message { role: "user", content: user },
            ],
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| {
                warn!(error = %e, "LLM request failed");
                LlmError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!(status = %status, "LLM API error");
            return Err(LlmError::Api { status: status.as_u16(), body });
        }

        let raw: ChatResponseRaw = response.json().map_err(|e| LlmError::Parse(e.to_string()))?;
        let content = raw
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::Parse(s!("No choices in response")))?;

        debug!(model = %self.model, duration_ms = start.elapsed().as_millis(), "LLM chat completion");
        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_as_chat_completion() {
        let req = ChatRequest {
            model: "gpt-4-1106-preview",
            temperature: 0.2,
            messages: [
                Message { role: "system", content: "sys" },
                Message { role: "user", content: "hi" },
            ],
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["model"], "gpt-4-1106-preview");
        assert_eq!(v["messages"][0]["role"], "system");
        assert_eq!(v["messages"][1]["content"], "hi");
    }

    #[test]
    fn response_with_null_content_parses() {
        let raw: ChatResponseRaw =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#).unwrap();
        assert!(raw.choices[0].message.content.is_none());
    }

    #[test]
    fn missing_key_is_config_error() {
        let env = EnvSettings::default();
        assert!(matches!(OpenAiClient::from_settings(&env), Err(LlmError::Config(_))));
    }
}

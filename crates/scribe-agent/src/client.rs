//! Gemini API client
//!
//! Key design: one prompt, one POST, one answer. There is no conversation
//! history, no retry and no streaming. The formatting suffix is appended on
//! the way out and the reply is cleaned on the way back, so callers only see
//! usable text.

use async_trait::async_trait;
use reqwest::StatusCode;
use scribe_core::response::{self, ResponseType};
use scribe_core::{ModelConfig, Result, ScribeError};
use std::sync::Mutex;

use crate::auth;
use crate::types::{ApiErrorBody, GenerateRequest, GenerateResponse};

/// Anything that turns a prompt into cleaned model text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Compose the prompt for `response_type`, send it, and return the
    /// cleaned reply
    async fn generate(&self, prompt: &str, response_type: Option<ResponseType>) -> Result<String>;
}

/// Client for the Gemini generateContent endpoint
#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    endpoint: String,
    debug: bool,
    http: reqwest::Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint)
            .field("debug", &self.debug)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl GeminiClient {
    /// Create a client; an empty key is a configuration error
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ScribeError::Config("API key must not be empty".to_string()));
        }

        Ok(Self {
            api_key,
            endpoint: endpoint.into(),
            debug: false,
            http: reqwest::Client::new(),
        })
    }

    /// Create a client from model configuration, reading the key from the
    /// configured environment variable
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        let api_key = auth::get_api_key(&config.api_key_env)?;
        Self::new(api_key, config.endpoint())
    }

    /// Log composed prompts and raw replies
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, response_type: Option<ResponseType>) -> Result<String> {
        let composed = response::format(prompt, response_type);

        tracing::debug!(
            "Calling Gemini API ({} chars, response type {})",
            composed.len(),
            response_type.map(|rt| rt.as_str()).unwrap_or("none")
        );
        if self.debug {
            tracing::debug!("Composed prompt:\n{}", composed);
        }

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&GenerateRequest::from_prompt(composed))
            .send()
            .await
            // the URL carries the key
            .map_err(|e| ScribeError::Transport(format!("Failed to send request: {}", e.without_url())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ScribeError::Transport(format!("Failed to read response: {}", e.without_url())))?;

        if !status.is_success() {
            return Err(ScribeError::Transport(api_error_message(status, &body)));
        }

        if self.debug {
            tracing::debug!("Raw response: {}", body);
        }

        let text = parse_response_text(&body)?;
        tracing::debug!("Gemini API returned {} chars", text.len());
        Ok(text)
    }
}

/// Extract and clean `candidates[0].content.parts[0].text`
pub(crate) fn parse_response_text(body: &str) -> Result<String> {
    let parsed: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| ScribeError::Format(format!("Failed to parse response: {}", e)))?;

    let text = parsed.first_text().ok_or_else(|| {
        ScribeError::Format("Missing candidates[0].content.parts[0].text".to_string())
    })?;

    if text.trim().is_empty() {
        return Err(ScribeError::Format("Empty response from API".to_string()));
    }

    let cleaned = response::clean(&text);
    if cleaned.is_empty() {
        return Err(ScribeError::Format(
            "Empty response after removing code fences".to_string(),
        ));
    }

    Ok(cleaned)
}

/// Prefer the API's own error message over the raw body
fn api_error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => match parsed.error.code {
            Some(code) => format!("Gemini API error {}: {}", code, parsed.error.message),
            None => format!("Gemini API error {}: {}", status, parsed.error.message),
        },
        Err(_) => format!("Gemini API error {}: {}", status, body.trim()),
    }
}

type Responder = Box<dyn Fn(&str, Option<ResponseType>) -> Result<String> + Send + Sync>;

/// Scripted generator for tests
///
/// Every call is recorded; the reply comes from the responder closure.
pub struct MockGenerator {
    responder: Responder,
    calls: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&str, Option<ResponseType>) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `reply`
    pub fn replying(reply: impl Into<String>) -> Self {
        let reply = reply.into();
        Self::new(move |_, _| Ok(reply.clone()))
    }

    /// Always fail with a transport error
    pub fn failing(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(move |_, _| Err(ScribeError::Transport(message.clone())))
    }

    /// Prompts received so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }
}

impl std::fmt::Debug for MockGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockGenerator")
            .field("calls", &self.call_count())
            .finish()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str, response_type: Option<ResponseType>) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(prompt.to_string());
        }
        (self.responder)(prompt, response_type)
    }
}

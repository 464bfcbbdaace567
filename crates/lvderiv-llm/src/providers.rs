//! HTTP backends.
//!
//! All three use blocking `reqwest`: the derivation runs are strictly
//! sequential, one request in flight at a time.

use reqwest::blocking::{Client, RequestBuilder};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::config::{
    normalize_http_base_url, LlmConfig, ModelKind, ANTHROPIC_VERSION_ENV,
    DEFAULT_ANTHROPIC_BASE_URL, DEFAULT_ANTHROPIC_VERSION, DEFAULT_GEMINI_BASE_URL,
    DEFAULT_OPENAI_BASE_URL, LVDERIV_MOCK_RESPONSE_ENV,
};
use crate::{ConfigError, LlmError, MockBackend, ModelBackend};

/// Token budget for extended thinking (Gemini and Claude).
const REASONING_BUDGET_TOKENS: u32 = 1024;
const ANTHROPIC_MAX_TOKENS: u32 = 1536;

fn build_client(timeout: Option<Duration>) -> Result<Client, ConfigError> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| ConfigError::Invalid(format!("failed to build http client: {e}")))
}

fn send_json(backend: &'static str, request: RequestBuilder, body: &Value) -> Result<Value, LlmError> {
    let resp = request
        .json(body)
        .send()
        .map_err(|e| LlmError::Network(format!("failed to reach {backend}: {e}")))?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().unwrap_or_default();
        return Err(LlmError::Api {
            backend,
            status,
            body,
        });
    }

    resp.json()
        .map_err(|e| LlmError::InvalidResponse(format!("{backend} returned invalid JSON: {e}")))
}

fn push_line(out: &mut String, text: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(text);
}

// =============================================================================
// OpenAI (Responses API)
// =============================================================================

pub struct OpenAiBackend {
    client: Client,
    url: String,
    api_key: String,
    model: &'static str,
    label: String,
}

impl OpenAiBackend {
    pub fn new(config: &LlmConfig) -> Result<Self, ConfigError> {
        let base_url = normalize_http_base_url(
            config.base_url.as_deref().unwrap_or(DEFAULT_OPENAI_BASE_URL),
            DEFAULT_OPENAI_BASE_URL,
        );
        Ok(Self {
            client: build_client(config.timeout)?,
            url: format!("{base_url}/v1/responses"),
            api_key: config.api_key.clone(),
            model: config.kind.api_model(),
            label: config.run_label(),
        })
    }
}

/// Concatenate the `output_text` parts of all `message` items.
pub(crate) fn openai_extract_output_text(v: &Value) -> Option<String> {
    let mut out = String::new();
    for item in v.get("output")?.as_array()? {
        // Reasoning summaries and tool calls are separate item types.
        if item.get("type").and_then(Value::as_str) != Some("message") {
            continue;
        }
        let Some(content) = item.get("content").and_then(Value::as_array) else {
            continue;
        };
        for c in content {
            if c.get("type").and_then(Value::as_str) != Some("output_text") {
                continue;
            }
            if let Some(t) = c.get("text").and_then(Value::as_str) {
                push_line(&mut out, t);
            }
        }
    }
    Some(out)
}

impl ModelBackend for OpenAiBackend {
    fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let body = json!({
            "model": self.model,
            "input": prompt,
        });
        debug!(url = %self.url, model = self.model, "openai request");
        let request = self.client.post(&self.url).bearer_auth(&self.api_key);
        let v = send_json("openai", request, &body)?;
        openai_extract_output_text(&v).ok_or_else(|| {
            LlmError::InvalidResponse("openai: no output in response (unexpected shape)".to_string())
        })
    }

    fn label(&self) -> &str {
        &self.label
    }
}

// =============================================================================
// Gemini (generateContent)
// =============================================================================

pub struct GeminiBackend {
    client: Client,
    url: String,
    api_key: String,
    thinking_budget: u32,
    label: String,
}

impl GeminiBackend {
    pub fn new(config: &LlmConfig) -> Result<Self, ConfigError> {
        let base_url = normalize_http_base_url(
            config.base_url.as_deref().unwrap_or(DEFAULT_GEMINI_BASE_URL),
            DEFAULT_GEMINI_BASE_URL,
        );
        Ok(Self {
            client: build_client(config.timeout)?,
            url: format!(
                "{base_url}/v1beta/models/{}:generateContent",
                config.kind.api_model()
            ),
            api_key: config.api_key.clone(),
            thinking_budget: if config.reasoning { REASONING_BUDGET_TOKENS } else { 0 },
            label: config.run_label(),
        })
    }
}

/// Text of the first candidate, skipping thought parts, trimmed.
pub(crate) fn gemini_extract_text(v: &Value) -> Option<String> {
    let parts = v
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let mut out = String::new();
    for p in parts {
        if p.get("thought").and_then(Value::as_bool) == Some(true) {
            continue;
        }
        if let Some(t) = p.get("text").and_then(Value::as_str) {
            out.push_str(t);
        }
    }
    Some(out.trim().to_string())
}

impl ModelBackend for GeminiBackend {
    fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let body = json!({
            "contents": [
                { "role": "user", "parts": [ { "text": prompt } ] }
            ],
            "generationConfig": {
                "thinkingConfig": { "thinkingBudget": self.thinking_budget }
            }
        });
        debug!(url = %self.url, thinking_budget = self.thinking_budget, "gemini request");
        let request = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key);
        let v = send_json("gemini", request, &body)?;
        gemini_extract_text(&v).ok_or_else(|| {
            LlmError::InvalidResponse("gemini: no candidates in response (unexpected shape)".to_string())
        })
    }

    fn label(&self) -> &str {
        &self.label
    }
}

// =============================================================================
// Anthropic (Messages API)
// =============================================================================

pub struct AnthropicBackend {
    client: Client,
    url: String,
    api_key: String,
    version: String,
    model: &'static str,
    reasoning: bool,
    label: String,
}

impl AnthropicBackend {
    pub fn new(config: &LlmConfig) -> Result<Self, ConfigError> {
        let base_url = normalize_http_base_url(
            config.base_url.as_deref().unwrap_or(DEFAULT_ANTHROPIC_BASE_URL),
            DEFAULT_ANTHROPIC_BASE_URL,
        );
        let version = std::env::var(ANTHROPIC_VERSION_ENV)
            .unwrap_or_else(|_| DEFAULT_ANTHROPIC_VERSION.to_string());
        Ok(Self {
            client: build_client(config.timeout)?,
            url: format!("{base_url}/v1/messages"),
            api_key: config.api_key.clone(),
            version,
            model: config.kind.api_model(),
            reasoning: config.reasoning,
            label: config.run_label(),
        })
    }

    fn request_body(&self, prompt: &str) -> Value {
        let thinking = if self.reasoning {
            json!({ "type": "enabled", "budget_tokens": REASONING_BUDGET_TOKENS })
        } else {
            json!({ "type": "disabled" })
        };
        json!({
            "model": self.model,
            "max_tokens": ANTHROPIC_MAX_TOKENS,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "thinking": thinking,
        })
    }
}

/// Concatenate `text` blocks; thinking blocks are dropped.
pub(crate) fn anthropic_extract_output_text(v: &Value) -> Option<String> {
    let mut out = String::new();
    for b in v.get("content")?.as_array()? {
        if b.get("type").and_then(Value::as_str) != Some("text") {
            continue;
        }
        if let Some(t) = b.get("text").and_then(Value::as_str) {
            push_line(&mut out, t);
        }
    }
    Some(out)
}

impl ModelBackend for AnthropicBackend {
    fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let body = self.request_body(prompt);
        debug!(url = %self.url, model = self.model, reasoning = self.reasoning, "anthropic request");
        let request = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.version);
        let v = send_json("anthropic", request, &body)?;
        anthropic_extract_output_text(&v).ok_or_else(|| {
            LlmError::InvalidResponse(
                "anthropic: no content blocks in response (unexpected shape)".to_string(),
            )
        })
    }

    fn label(&self) -> &str {
        &self.label
    }
}

// =============================================================================
// Selection
// =============================================================================

/// Build the backend selected by `config`.
pub fn create_backend(config: &LlmConfig) -> Result<Box<dyn ModelBackend>, ConfigError> {
    Ok(match config.kind {
        ModelKind::O3 | ModelKind::Gpt41 => Box::new(OpenAiBackend::new(config)?),
        ModelKind::Gemini25Flash => Box::new(GeminiBackend::new(config)?),
        ModelKind::Claude37Sonnet => Box::new(AnthropicBackend::new(config)?),
        ModelKind::Mock => {
            let response = std::env::var(LVDERIV_MOCK_RESPONSE_ENV).unwrap_or_default();
            Box::new(MockBackend::always(&response))
        }
    })
}

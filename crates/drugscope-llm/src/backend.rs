//! LLM backend trait and concrete implementations.
//!
//! Backends:
//!   AgentAiBackend          : hosted Agent.ai `invoke_llm` action
//!   OpenAiCompatibleBackend : any OpenAI-compatible chat endpoint (Ollama,
//!                             LMStudio, vLLM, OpenRouter, …)
//!   UnconfiguredBackend     : stands in when no credentials are available

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("LLM request timed out")]
    Timeout,
    #[error("LLM backend is not configured: {0}")]
    NotConfigured(String),
    #[error("API error [{status}]: {message}")]
    ApiError { status: u16, message: String },
}

impl LlmError {
    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Http(err)
        }
    }
}

// ── Request / Response ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    pub instructions: String,
    /// Engine or model name; the backend default when absent.
    pub engine: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// Upstream JSON, verbatim for Agent.ai and `{"response": …}` for chat backends.
    pub content: serde_json::Value,
    pub engine: String,
}

// ── Trait ─────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError>;
    fn model_id(&self) -> &str;
    fn is_configured(&self) -> bool { true }
}

/// Non-2xx statuses become `ApiError` carrying the raw body text.
async fn read_json(resp: reqwest::Response) -> Result<serde_json::Value, LlmError> {
    let status = resp.status();
    let text = resp.text().await.map_err(LlmError::from_transport)?;
    if !status.is_success() {
        return Err(LlmError::ApiError { status: status.as_u16(), message: text });
    }
    Ok(serde_json::from_str(&text)?)
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

// ── 1. Agent.ai ───────────────────────────────────────────────────────────────

pub struct AgentAiBackend {
    pub url: String,
    pub default_engine: String,
    api_key: SecretString,
    client: reqwest::Client,
}

impl AgentAiBackend {
    pub fn new(
        url: impl Into<String>,
        api_key: SecretString,
        default_engine: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            url: url.into(),
            default_engine: default_engine.into(),
            api_key,
            client: build_client(timeout)?,
        })
    }
}

#[async_trait]
impl LlmBackend for AgentAiBackend {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError> {
        let engine = req.engine.unwrap_or_else(|| self.default_engine.clone());
        let body = serde_json::json!({
            "instructions": req.instructions,
            "llm_engine":   engine,
        });
        debug!(url = %self.url, %engine, "Invoking Agent.ai");
        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(LlmError::from_transport)?;
        let content = read_json(resp).await?;
        Ok(LlmResponse { content, engine })
    }

    fn model_id(&self) -> &str { &self.default_engine }
}

// ── 2. OpenAI-Compatible ──────────────────────────────────────────────────────

pub struct OpenAiCompatibleBackend {
    pub base_url: String,
    pub model: String,
    api_key: Option<SecretString>,
    client: reqwest::Client,
}

impl OpenAiCompatibleBackend {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key,
            client: build_client(timeout)?,
        })
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(k) => req.bearer_auth(k.expose_secret()),
            None    => req,
        }
    }
}

#[async_trait]
impl LlmBackend for OpenAiCompatibleBackend {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));
        let engine = req.engine.unwrap_or_else(|| self.model.clone());
        let body = serde_json::json!({
            "model":       engine,
            "messages":    [{"role": "user", "content": req.instructions}],
            "temperature": 0.1,
        });
        let resp = self
            .auth(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(LlmError::from_transport)?;
        let json = read_json(resp).await?;
        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string();
        Ok(LlmResponse { content: serde_json::json!({ "response": content }), engine })
    }

    fn model_id(&self) -> &str { &self.model }
}

// ── 3. Unconfigured ───────────────────────────────────────────────────────────

/// Fails every request; used when the selected provider lacks credentials.
pub struct UnconfiguredBackend {
    reason: String,
}

impl UnconfiguredBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl LlmBackend for UnconfiguredBackend {
    async fn complete(&self, _req: LlmRequest) -> Result<LlmResponse, LlmError> {
        Err(LlmError::NotConfigured(self.reason.clone()))
    }

    fn model_id(&self) -> &str { "none" }
    fn is_configured(&self) -> bool { false }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn test_agent_ai_default_engine() {
        let b = AgentAiBackend::new("https://example.invalid/invoke", secret("k"), "gpt4o", Duration::from_secs(5)).unwrap();
        assert_eq!(b.model_id(), "gpt4o");
        assert!(b.is_configured());
    }

    #[test]
    fn test_openai_compatible_with_no_key() {
        let b = OpenAiCompatibleBackend::new("http://localhost:1234", "local-model", None, Duration::from_secs(5)).unwrap();
        // No API key is valid for LMStudio / vLLM
        assert_eq!(b.model_id(), "local-model");
    }

    #[tokio::test]
    async fn test_unconfigured_backend_refuses() {
        let b = UnconfiguredBackend::new("no API key");
        let err = b
            .complete(LlmRequest { instructions: "hi".into(), engine: None })
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::NotConfigured(_)));
        assert!(!b.is_configured());
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        let b = AgentAiBackend::new("http://127.0.0.1:9/invoke", secret("k"), "gpt4o", Duration::from_secs(2)).unwrap();
        let err = b
            .complete(LlmRequest { instructions: "hi".into(), engine: Some("gpt4o".into()) })
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Http(_) | LlmError::Timeout));
    }
}

//! Configuration loading for Drugscope.
//! Reads drugscope.toml from the current directory or the path in DRUGSCOPE_CONFIG,
//! then applies environment overrides (a `.env` file is honoured).

use std::path::Path;

use drugscope_common::{DrugscopeError, Result};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use tracing::{info, warn};


pub const DEFAULT_CONFIG_PATH: &str = "drugscope.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub binding: BindingConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

// ── Server ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String { "0.0.0.0:8000".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

// ── Generation ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// Upper bound on `num_samples` accepted by the API.
    #[serde(default = "default_max_samples")]
    pub max_samples: usize,
    /// Scratch-mode attempt budget per requested molecule.
    #[serde(default = "default_attempts_per_sample")]
    pub attempts_per_sample: usize,
}

fn default_max_samples()         -> usize { 10 }
fn default_attempts_per_sample() -> usize { 10 }

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_samples: default_max_samples(),
            attempts_per_sample: default_attempts_per_sample(),
        }
    }
}

// ── Binding model ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct BindingConfig {
    /// Unset means the binding endpoints answer 503.
    pub base_url: Option<String>,
    #[serde(default = "default_binding_model")]
    pub model: String,
    #[serde(default = "default_binding_timeout")]
    pub timeout_secs: u64,
}

/// Model name sent with every binding request unless configured otherwise.
pub const DEFAULT_BINDING_MODEL: &str = "CNN_CNN_DAVIS";

fn default_binding_model()   -> String { DEFAULT_BINDING_MODEL.to_string() }
fn default_binding_timeout() -> u64 { 60 }

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model: default_binding_model(),
            timeout_secs: default_binding_timeout(),
        }
    }
}

// ── LLM ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum LlmProvider {
    #[default]
    #[serde(rename = "agent_ai")]
    AgentAi,
    #[serde(rename = "openai_compatible")]
    OpenAiCompatible,
}

#[derive(Debug, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProvider,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub api_key: Option<SecretString>,
    #[serde(default = "default_engine")]
    pub default_engine: String,
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

fn default_llm_base_url() -> String { "https://api-lr.agent.ai/v1/action/invoke_llm".to_string() }
fn default_engine()       -> String { "gpt4o".to_string() }
fn default_llm_timeout()  -> u64 { 30 }

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            base_url: default_llm_base_url(),
            api_key: None,
            default_engine: default_engine(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()).map(SecretString::from))
}

// ── Loading ─────────────────────────────────────────────────────────────────

impl Config {
    /// Load configuration from drugscope.toml plus the environment.
    /// A missing file is not an error: defaults are used.
    pub fn load() -> Result<Self> {
        if dotenvy::dotenv().is_ok() {
            info!("Loaded environment from .env");
        }
        let path = std::env::var("DRUGSCOPE_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = Self::load_from(Path::new(&path))?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(
                "Config file not found: {}; using defaults. Copy drugscope.example.toml to drugscope.toml to customise.",
                path.display()
            );
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Environment variables win over the file.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("DRUGSCOPE_BIND") {
            self.server.bind = bind;
        }
        if let Some(url) = lookup("DRUGSCOPE_BINDING_URL") {
            self.binding.base_url = Some(url).filter(|u| !u.is_empty());
        }
        if let Some(key) = lookup("DRUGSCOPE_LLM_API_KEY").filter(|k| !k.is_empty()) {
            self.llm.api_key = Some(SecretString::from(key));
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.generation.max_samples == 0 {
            return Err(DrugscopeError::Config("generation.max_samples must be at least 1".into()));
        }
        if self.generation.attempts_per_sample == 0 {
            return Err(DrugscopeError::Config("generation.attempts_per_sample must be at least 1".into()));
        }
        if self.binding.timeout_secs == 0 || self.llm.timeout_secs == 0 {
            return Err(DrugscopeError::Config("timeouts must be non-zero".into()));
        }
        Ok(())
    }
}

//! Backend selection from configuration.

use std::sync::Arc;
use std::time::Duration;

use drugscope_config::{LlmConfig, LlmProvider};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use crate::backend::{AgentAiBackend, LlmBackend, LlmError, OpenAiCompatibleBackend, UnconfiguredBackend};

/// Build the backend named by `config.provider`.
///
/// Agent.ai requires an API key; without one the returned backend refuses
/// every request so the rest of the service still starts.
pub fn build_backend(config: &LlmConfig) -> Result<Arc<dyn LlmBackend>, LlmError> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let key = config
        .api_key
        .as_ref()
        .map(|k| SecretString::from(k.expose_secret().to_string()));

    let backend: Arc<dyn LlmBackend> = match (config.provider, key) {
        (LlmProvider::AgentAi, Some(key)) => {
            info!(url = %config.base_url, engine = %config.default_engine, "Using Agent.ai backend");
            Arc::new(AgentAiBackend::new(&config.base_url, key, &config.default_engine, timeout)?)
        }
        (LlmProvider::AgentAi, None) => {
            warn!("No LLM API key configured (set DRUGSCOPE_LLM_API_KEY); /agentai is disabled");
            Arc::new(UnconfiguredBackend::new("no Agent.ai API key"))
        }
        (LlmProvider::OpenAiCompatible, key) => {
            info!(url = %config.base_url, model = %config.default_engine, "Using OpenAI-compatible backend");
            Arc::new(OpenAiCompatibleBackend::new(&config.base_url, &config.default_engine, key, timeout)?)
        }
    };
    Ok(backend)
}

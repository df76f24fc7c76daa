//! Shared application state for the web server.

use std::sync::Arc;
use std::time::Duration;

use drugscope_config::Config;
use drugscope_llm::{build_backend, LlmBackend};
use drugscope_molecules::{BindingPredictor, Generator, RemoteBindingModel};
use tracing::{info, warn};

/// Shared state injected into every Axum handler. Read-only after startup.
pub struct AppState {
    pub config: Config,
    pub generator: Generator,
    pub llm: Arc<dyn LlmBackend>,
    /// `None` when no binding service URL is configured.
    pub binding: Option<Arc<dyn BindingPredictor>>,
}

impl AppState {
    pub fn new(config: Config, llm: Arc<dyn LlmBackend>, binding: Option<Arc<dyn BindingPredictor>>) -> Self {
        let generator = Generator::new(config.generation.attempts_per_sample);
        Self { config, generator, llm, binding }
    }

    /// Build the remote clients described by `config`.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let llm = build_backend(&config.llm)?;
        let binding: Option<Arc<dyn BindingPredictor>> = match &config.binding.base_url {
            Some(url) => {
                info!(%url, model = %config.binding.model, "Binding model configured");
                let model = RemoteBindingModel::new(
                    url,
                    &config.binding.model,
                    Duration::from_secs(config.binding.timeout_secs),
                )?;
                Some(Arc::new(model))
            }
            None => {
                warn!("No binding model URL configured (set DRUGSCOPE_BINDING_URL); /binding and /agent are disabled");
                None
            }
        };
        Ok(Self::new(config, llm, binding))
    }
}

pub type SharedState = Arc<AppState>;

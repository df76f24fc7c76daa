//! drugscope-llm - LLM backend abstraction layer.
//! Implements the LlmBackend trait, the remote backends, and the prompt
//! used to ask for an analysis of a drug candidate.

pub mod backend;
pub mod prompt;
pub mod provider;

pub use backend::{
    AgentAiBackend, LlmBackend, LlmError, LlmRequest, LlmResponse, OpenAiCompatibleBackend, UnconfiguredBackend,
};
pub use prompt::build_analysis_prompt;
pub use provider::build_backend;

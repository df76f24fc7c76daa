//! LLM-backed analysis of a drug candidate.

use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use drugscope_llm::{build_analysis_prompt, LlmRequest};

use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct AgentAiRequest {
    pub instructions: String,
    pub drug_data: serde_json::Map<String, Value>,
    pub llm_engine: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AgentAiResponse {
    pub query: String,
    pub context: Value,
    pub analysis: Value,
    pub message: String,
}

/// POST /agentai/ - Ask the LLM about a drug's computed properties
pub async fn agent_ai(
    State(state): State<SharedState>,
    WithRejection(Json(req), _): WithRejection<Json<AgentAiRequest>, ApiError>,
) -> Result<Json<AgentAiResponse>, ApiError> {
    let context = Value::Object(req.drug_data);
    let prompt = build_analysis_prompt(&context, &req.instructions);
    let engine = req
        .llm_engine
        .unwrap_or_else(|| state.config.llm.default_engine.clone());

    info!(%engine, backend = state.llm.model_id(), "Requesting AI analysis");
    let response = state
        .llm
        .complete(LlmRequest { instructions: prompt, engine: Some(engine) })
        .await?;

    Ok(Json(AgentAiResponse {
        query: req.instructions,
        context,
        analysis: response.content,
        message: "AI analysis completed successfully".to_string(),
    }))
}

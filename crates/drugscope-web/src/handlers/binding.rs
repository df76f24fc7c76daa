//! Binding prediction and the combined analysis endpoint.

use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use drugscope_molecules::{evaluate_admet, evaluate_drug_likeness, AdmetReport, BindingError, DrugLikenessReport};

use crate::error::ApiError;
use crate::state::SharedState;

const BINDING_MESSAGE: &str = "Higher scores indicate stronger predicted binding";

#[derive(Debug, Deserialize)]
pub struct BindingRequest {
    pub drug: String,
    pub target: String,
    /// Accepted for compatibility; the configured model is always used.
    #[serde(default = "default_model_type")]
    pub model_type: String,
}

fn default_model_type() -> String { "CNN".to_string() }

impl BindingRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if self.drug.is_empty() {
            return Err(ApiError::unprocessable("SMILES string cannot be empty"));
        }
        if self.target.is_empty() {
            return Err(ApiError::unprocessable("Protein sequence cannot be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct BindingResponse {
    pub drug_smiles: String,
    pub target_sequence: String,
    pub binding_score: f64,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AgentResponse {
    pub drug_smiles: String,
    pub target_sequence: String,
    pub drug_likeness: DrugLikenessReport,
    pub binding_score: f64,
    pub admet: AdmetReport,
    pub message: String,
}

async fn predict(state: &SharedState, req: &BindingRequest) -> Result<f64, ApiError> {
    let predictor = state.binding.as_ref().ok_or(BindingError::NotConfigured)?;
    debug!(model = predictor.model_id(), requested = %req.model_type, "Predicting binding");
    Ok(predictor.predict(&req.drug, &req.target).await?)
}

/// POST /binding/ - Drug-target binding affinity
pub async fn binding(
    State(state): State<SharedState>,
    WithRejection(Json(req), _): WithRejection<Json<BindingRequest>, ApiError>,
) -> Result<Json<BindingResponse>, ApiError> {
    req.validate()?;
    let binding_score = predict(&state, &req).await?;
    info!(binding_score, "Binding predicted");
    Ok(Json(BindingResponse {
        drug_smiles: req.drug,
        target_sequence: req.target,
        binding_score,
        message: BINDING_MESSAGE.to_string(),
    }))
}

/// POST /agent/ - Drug-likeness, binding and ADMET in one call
pub async fn agent(
    State(state): State<SharedState>,
    WithRejection(Json(req), _): WithRejection<Json<BindingRequest>, ApiError>,
) -> Result<Json<AgentResponse>, ApiError> {
    req.validate()?;
    let drug = req.drug.clone();
    let (drug_likeness, admet) = tokio::task::spawn_blocking(move || {
        let drug_likeness = evaluate_drug_likeness(&drug)?;
        let admet = evaluate_admet(&drug)?;
        Ok::<_, ApiError>((drug_likeness, admet))
    })
    .await??;

    let binding_score = predict(&state, &req).await?;
    info!(binding_score, verdict = ?drug_likeness.drug_likeness, "Full analysis complete");
    Ok(Json(AgentResponse {
        drug_smiles: req.drug,
        target_sequence: req.target,
        drug_likeness,
        binding_score,
        admet,
        message: BINDING_MESSAGE.to_string(),
    }))
}

//! Drug-likeness and ADMET endpoints.

use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use drugscope_molecules::{evaluate_admet, evaluate_drug_likeness, AdmetReport, DrugLikenessReport};

use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct SmilesRequest {
    pub smiles: String,
}

impl SmilesRequest {
    fn validated(self) -> Result<String, ApiError> {
        if self.smiles.is_empty() {
            return Err(ApiError::unprocessable("SMILES string cannot be empty"));
        }
        Ok(self.smiles)
    }
}

/// POST /lipinski/ - Rule of Five report
pub async fn lipinski(
    State(_state): State<SharedState>,
    WithRejection(Json(req), _): WithRejection<Json<SmilesRequest>, ApiError>,
) -> Result<Json<DrugLikenessReport>, ApiError> {
    let smiles = req.validated()?;
    let report = tokio::task::spawn_blocking(move || evaluate_drug_likeness(&smiles)).await??;
    Ok(Json(report))
}

/// POST /admet/ - Absorption, metabolism and toxicity estimates
pub async fn admet(
    State(_state): State<SharedState>,
    WithRejection(Json(req), _): WithRejection<Json<SmilesRequest>, ApiError>,
) -> Result<Json<AdmetReport>, ApiError> {
    let smiles = req.validated()?;
    let report = tokio::task::spawn_blocking(move || evaluate_admet(&smiles)).await??;
    Ok(Json(report))
}

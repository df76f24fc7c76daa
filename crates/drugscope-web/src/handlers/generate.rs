//! Molecule generation endpoint.

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use tracing::info;

use drugscope_molecules::GenerationReport;

use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct GenerateParams {
    pub num_samples: Option<i64>,
    pub seed_smiles: Option<String>,
}

/// GET /generate/ - Scratch assembly, or mutation of `seed_smiles`
pub async fn generate(
    State(state): State<SharedState>,
    WithRejection(Query(params), _): WithRejection<Query<GenerateParams>, ApiError>,
) -> Result<Json<GenerationReport>, ApiError> {
    let max = state.config.generation.max_samples;
    let num_samples = params.num_samples.unwrap_or(1);
    let num_samples = usize::try_from(num_samples)
        .ok()
        .filter(|n| (1..=max).contains(n))
        .ok_or_else(|| ApiError::unprocessable(format!("num_samples must be between 1 and {max}")))?;
    let seed = params.seed_smiles.filter(|s| !s.is_empty());

    info!(num_samples, seeded = seed.is_some(), "Generating molecules");
    let generator = state.generator.clone();
    let report = tokio::task::spawn_blocking(move || {
        let mut rng = rand::thread_rng();
        generator.generate(num_samples, seed.as_deref(), &mut rng)
    })
    .await??;
    Ok(Json(report))
}

//! Service information.

use axum::Json;
use serde_json::{json, Value};

/// GET / - API name, version and endpoint map
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "Drug Analysis API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "API for drug analysis and prediction with AI insights",
        "endpoints": {
            "/generate": "Generate novel drug-like molecules",
            "/lipinski": "Check Lipinski's Rule of Five",
            "/binding": "Predict drug-target binding",
            "/admet": "Predict ADMET properties",
            "/agent": "Perform complete drug analysis",
            "/agentai": "Get AI-powered analysis and recommendations"
        }
    }))
}

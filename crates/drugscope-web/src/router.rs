//! Axum router - maps all URL paths to handlers.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
};

use crate::handlers::{
    agent_ai::agent_ai,
    binding::{agent, binding},
    evaluate::{admet, lipinski},
    generate::generate,
    system::root,
};
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
/// Every endpoint is served both with and without a trailing slash.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        .route("/",          get(root))
        .route("/generate",  get(generate))
        .route("/generate/", get(generate))
        .route("/lipinski",  post(lipinski))
        .route("/lipinski/", post(lipinski))
        .route("/admet",     post(admet))
        .route("/admet/",    post(admet))
        .route("/binding",   post(binding))
        .route("/binding/",  post(binding))
        .route("/agent",     post(agent))
        .route("/agent/",    post(agent))
        .route("/agentai",   post(agent_ai))
        .route("/agentai/",  post(agent_ai))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

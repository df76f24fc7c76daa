//! HTTP handlers for all API routes.

pub mod agent_ai;
pub mod binding;
pub mod evaluate;
pub mod generate;
pub mod system;

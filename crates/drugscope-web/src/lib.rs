//! drugscope-web - HTTP API for Drugscope.
//! Exposes:
//!   - Molecule generation from fragments or a seed
//!   - Lipinski and ADMET evaluation
//!   - Remote binding-affinity prediction and the combined analysis
//!   - LLM-backed analysis of a drug's properties

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

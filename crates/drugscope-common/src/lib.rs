//! drugscope-common - Shared error type used across the Drugscope crates.

pub mod error;

pub use error::{DrugscopeError, Result};

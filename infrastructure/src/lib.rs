//! Infrastructure layer for strata-council
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer, plus configuration file loading.

pub mod config;
pub mod gateway;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use gateway::{AgentServiceSettings, HttpAgentGateway};

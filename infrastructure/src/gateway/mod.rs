//! Outbound adapters for the agent service

mod agent_api;

pub use agent_api::{AgentServiceSettings, HttpAgentGateway};

//! Application layer for strata-council
//!
//! This crate contains the orchestration use cases and port definitions.
//! It depends only on the domain layer; adapters for the ports live in the
//! infrastructure and presentation layers.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::DebateParams;
pub use ports::{
    agent_gateway::{AgentGateway, AgentReply, EvidenceRef, GatewayError},
    progress::{DebatePhase, DebateProgress, NoProgress},
    report_renderer::{PlainReportRenderer, ReportRenderer},
};
pub use use_cases::host_override::{HostOverrideError, HostOverrideUseCase};
pub use use_cases::manual_ask::{ManualAskError, ManualAskInput, ManualAskUseCase};
pub use use_cases::reset_sessions::{ResetReport, ResetSessionsError, ResetSessionsUseCase};
pub use use_cases::run_debate::{RunDebateError, RunDebateInput, RunDebateUseCase};
pub use use_cases::shared::{DebateState, SharedState};

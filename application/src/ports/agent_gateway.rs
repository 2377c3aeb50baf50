//! Agent gateway port
//!
//! Defines how the orchestrator reaches the upstream agent service. The
//! HTTP adapter lives in the infrastructure layer; tests script the trait
//! directly.

use async_trait::async_trait;
use council_domain::SessionHandle;
use thiserror::Error;

/// Errors that can occur on an outbound agent call
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("session error: {0}")]
    Session(String),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("timeout")]
    Timeout,

    #[error("{0}")]
    Other(String),
}

/// A knowledge-base citation attached to an agent answer
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceRef {
    pub document: Option<String>,
    pub excerpt: Option<String>,
    pub similarity: Option<f64>,
}

/// One settled agent answer
#[derive(Debug, Clone)]
pub struct AgentReply {
    pub text: String,
    /// Fresh conversation handle, when the service rotated it
    pub new_session: Option<SessionHandle>,
    pub references: Vec<EvidenceRef>,
}

impl AgentReply {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            new_session: None,
            references: Vec::new(),
        }
    }

    /// An empty answer counts as an abstention upstream
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Gateway to the agent service
///
/// One call per prompt; the caller supplies the participant's current
/// session handle and stores any replacement the reply carries. The core
/// never retries; latency bounding (timeouts) is the adapter's job.
#[async_trait]
pub trait AgentGateway: Send + Sync {
    /// Open a fresh conversation for a participant. `Ok(None)` means the
    /// service declined a handle; subsequent calls go out stateless.
    async fn create_session(&self, key: &str) -> Result<Option<SessionHandle>, GatewayError>;

    /// Send a prompt to one participant and wait for its answer.
    ///
    /// `hidden` marks calls whose progress should not be surfaced to the
    /// user (moderator audits); it carries no protocol meaning.
    async fn complete(
        &self,
        key: &str,
        prompt: &str,
        session: Option<&SessionHandle>,
        hidden: bool,
    ) -> Result<AgentReply, GatewayError>;
}

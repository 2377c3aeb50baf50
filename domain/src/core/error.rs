//! Domain error types

use crate::debate::session::DebateStatus;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("a deliberation is already running")]
    SessionBusy,

    #[error("invalid session transition: {from} -> {to}")]
    InvalidTransition { from: DebateStatus, to: DebateStatus },
}

impl DomainError {
    /// Check whether this error is the busy-session rejection
    pub fn is_busy(&self) -> bool {
        matches!(self, DomainError::SessionBusy)
    }
}

//! Debate session state machine
//!
//! Exactly one session exists per process; callers serialize access to it.
//! Legal transitions:
//!
//! ```text
//! Idle ──> FanOut ──> AwaitingModerator ──> Dispatching
//!                          │    ^                │
//!                          │    └────────────────┘
//!                          └──> Finished | Aborted
//! ```
//!
//! Terminal states are Idle-equivalent: a finished or aborted session may
//! begin a new deliberation without being re-created.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Lifecycle status of the deliberation session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebateStatus {
    Idle,
    FanOut,
    AwaitingModerator,
    Dispatching,
    Finished,
    Aborted,
}

impl DebateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DebateStatus::Idle => "idle",
            DebateStatus::FanOut => "fan-out",
            DebateStatus::AwaitingModerator => "awaiting-moderator",
            DebateStatus::Dispatching => "dispatching",
            DebateStatus::Finished => "finished",
            DebateStatus::Aborted => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DebateStatus::Finished | DebateStatus::Aborted)
    }

    /// Running-equivalent: anything that is neither Idle nor terminal
    pub fn is_active(&self) -> bool {
        !self.is_terminal() && !matches!(self, DebateStatus::Idle)
    }
}

impl std::fmt::Display for DebateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The process-wide deliberation session (Entity)
#[derive(Debug, Clone)]
pub struct DebateSession {
    query: String,
    round: u32,
    max_rounds: u32,
    status: DebateStatus,
    file_context: Option<String>,
    file_context_enabled: bool,
}

impl DebateSession {
    pub fn new(max_rounds: u32) -> Self {
        Self {
            query: String::new(),
            round: 0,
            max_rounds: max_rounds.max(1),
            status: DebateStatus::Idle,
            file_context: None,
            file_context_enabled: false,
        }
    }

    /// Start a new deliberation: rejected while the session is active,
    /// with no state mutated on rejection.
    pub fn begin(&mut self, query: &str) -> Result<(), DomainError> {
        if self.status.is_active() {
            return Err(DomainError::SessionBusy);
        }
        self.query = query.trim().to_string();
        self.round = 0;
        self.status = DebateStatus::FanOut;
        Ok(())
    }

    /// Move to `next`, validating the edge against the state machine.
    pub fn advance(&mut self, next: DebateStatus) -> Result<(), DomainError> {
        use DebateStatus::*;
        let legal = matches!(
            (self.status, next),
            (FanOut, AwaitingModerator)
                | (AwaitingModerator, Dispatching)
                | (AwaitingModerator, Finished)
                | (AwaitingModerator, Aborted)
                | (Dispatching, AwaitingModerator)
        );
        if !legal {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Whether another moderator round may start (checked at round-start,
    /// so exactly `max_rounds` rounds execute)
    pub fn can_start_round(&self) -> bool {
        self.round < self.max_rounds
    }

    /// Enter the next round and return its number (1-based)
    pub fn begin_round(&mut self) -> u32 {
        debug_assert!(self.can_start_round());
        self.round += 1;
        self.round
    }

    /// Reset to Idle, clearing the query and round counter. The file
    /// context survives a reset.
    pub fn reset(&mut self) {
        self.query.clear();
        self.round = 0;
        self.status = DebateStatus::Idle;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    pub fn status(&self) -> DebateStatus {
        self.status
    }

    // ==================== File context ====================

    /// Attach a global reference document; enables it immediately.
    pub fn set_file_context(&mut self, content: Option<String>) {
        self.file_context_enabled = content.is_some();
        self.file_context = content;
    }

    pub fn set_file_context_enabled(&mut self, enabled: bool) {
        self.file_context_enabled = enabled && self.file_context.is_some();
    }

    pub fn file_context_enabled(&self) -> bool {
        self.file_context_enabled
    }

    /// The reference document, if present and enabled
    pub fn effective_file_context(&self) -> Option<&str> {
        if self.file_context_enabled {
            self.file_context.as_deref()
        } else {
            None
        }
    }
}

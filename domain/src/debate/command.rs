//! Typed moderator instructions
//!
//! A moderator reply decodes into exactly one [`Command`]. Downstream logic
//! pattern-matches exhaustively on the variants instead of probing fields.

use serde_json::{Map, Value};

/// Payload of a `FINISH` instruction
#[derive(Debug, Clone, PartialEq)]
pub enum FinishPayload {
    /// Free-form closing text
    Text(String),
    /// Structured verdict object (see [`crate::report::ReportPayload`])
    Report(Map<String, Value>),
}

/// Decoded moderator instruction
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Direct a follow-up question at one participant.
    ///
    /// `target` is whatever string the moderator produced; resolution
    /// against the registry is the orchestrator's job.
    Ask { target: String, content: String },
    /// Close the deliberation with a verdict
    Finish { payload: FinishPayload },
    /// The reply matched no known form; `raw` is the untouched text
    Malformed { raw: String },
}

impl Command {
    pub fn is_ask(&self) -> bool {
        matches!(self, Command::Ask { .. })
    }

    pub fn is_finish(&self) -> bool {
        matches!(self, Command::Finish { .. })
    }
}

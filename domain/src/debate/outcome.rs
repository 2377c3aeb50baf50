//! Terminal outcome of a deliberation

use crate::debate::session::DebateStatus;
use crate::report::ReportPayload;
use serde::Serialize;

/// What the moderator closed with, when it closed explicitly
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalVerdict {
    /// Structured verdict object (prediction or general report)
    Report(ReportPayload),
    /// Free-form closing text, including degraded endings where a raw
    /// moderator reply stands as the final word
    Text(String),
}

/// Result of one deliberation run
#[derive(Debug, Clone, Serialize)]
pub struct DebateOutcome {
    /// Rounds actually executed (`<= max_rounds` always)
    pub rounds: u32,
    /// Terminal status the session ended in
    pub status: DebateStatus,
    /// Explicit verdict, absent when the round cap exhausted the loop
    /// without a `FINISH`
    pub verdict: Option<FinalVerdict>,
}

impl DebateOutcome {
    pub fn verdict_text(&self) -> Option<String> {
        match &self.verdict {
            Some(FinalVerdict::Text(text)) => Some(text.clone()),
            Some(FinalVerdict::Report(report)) => {
                serde_json::to_string_pretty(report).ok()
            }
            None => None,
        }
    }
}

//! Progress notification port
//!
//! The presentation layer implements this to display deliberation progress
//! (console bars, REPL echo). System notices travel through [`DebateProgress::on_note`]
//! and never touch the transcript.

use council_domain::TranscriptEntry;

/// Phase of a deliberation, for display purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebatePhase {
    /// Concurrent broadcast of the opening query to all experts
    FanOut,
    /// One moderator audit round
    Moderation,
    /// A follow-up dispatched to a single expert
    Dispatch,
}

impl DebatePhase {
    pub fn display_name(&self) -> &'static str {
        match self {
            DebatePhase::FanOut => "Expert Fan-Out",
            DebatePhase::Moderation => "Moderator Audit",
            DebatePhase::Dispatch => "Follow-Up",
        }
    }
}

/// Callback for progress updates during a deliberation
///
/// All methods default to no-ops so implementations subscribe only to what
/// they display.
pub trait DebateProgress: Send + Sync {
    /// A phase with `total` independent calls is starting
    fn on_phase_start(&self, _phase: DebatePhase, _total: usize) {}

    /// One expert call settled during fan-out (failure == abstention)
    fn on_expert_settled(&self, _key: &str, _success: bool) {}

    fn on_phase_complete(&self, _phase: DebatePhase) {}

    /// A moderator round is starting (1-based)
    fn on_round_start(&self, _round: u32, _max_rounds: u32) {}

    /// The moderator directed a follow-up at `key`
    fn on_follow_up(&self, _key: &str, _question: &str) {}

    /// A contribution was appended to the transcript
    fn on_entry(&self, _entry: &TranscriptEntry) {}

    /// A visible system notice (never a transcript entry)
    fn on_note(&self, _note: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DebateProgress for NoProgress {}

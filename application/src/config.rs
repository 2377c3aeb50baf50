//! Application-level execution parameters

use std::time::Duration;

/// Tunables for the deliberation loop
#[derive(Debug, Clone)]
pub struct DebateParams {
    /// Hard cap on moderator rounds per deliberation
    pub max_rounds: u32,
    /// Courtesy pause between rounds; not correctness-bearing
    pub round_delay: Duration,
}

impl Default for DebateParams {
    fn default() -> Self {
        Self {
            max_rounds: 5,
            round_delay: Duration::from_millis(1000),
        }
    }
}

impl DebateParams {
    pub fn new(max_rounds: u32, round_delay: Duration) -> Self {
        Self {
            max_rounds: max_rounds.max(1),
            round_delay,
        }
    }
}

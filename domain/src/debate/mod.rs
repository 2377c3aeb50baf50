//! Deliberation protocol: moderator commands, reply parsing, the session
//! state machine, and terminal outcomes

pub mod command;
pub mod outcome;
pub mod parsing;
pub mod session;

pub use command::{Command, FinishPayload};
pub use outcome::{DebateOutcome, FinalVerdict};
pub use parsing::parse_moderator_reply;
pub use session::{DebateSession, DebateStatus};

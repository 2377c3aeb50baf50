//! Domain layer for strata-council
//!
//! This crate contains the core business logic of the deliberation engine.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Panel
//!
//! A fixed registry of specialist experts plus one moderator. Experts answer
//! independently; the moderator audits the discussion each round and either
//! asks a targeted follow-up or closes with a structured verdict.
//!
//! ## Transcript
//!
//! Append-only record of every non-system contribution. The transcript is
//! the single source of truth for prompt reconstruction: rendering it is a
//! pure function of its contents.
//!
//! ## Moderator protocol
//!
//! Moderator replies are decoded into exactly one [`Command`]. The parser
//! tries a strict JSON form first and degrades through recovery strategies
//! down to a plain-text `CMD:` grammar before giving up with
//! [`Command::Malformed`].

pub mod core;
pub mod debate;
pub mod participant;
pub mod prompt;
pub mod report;
pub mod transcript;

// Re-export commonly used types
pub use core::{error::DomainError, query::Query};
pub use debate::{
    command::{Command, FinishPayload},
    outcome::{DebateOutcome, FinalVerdict},
    parsing::parse_moderator_reply,
    session::{DebateSession, DebateStatus},
};
pub use participant::{Participant, ParticipantRegistry, SessionHandle};
pub use prompt::template::PromptTemplate;
pub use report::{ProbabilityGrade, ReportPayload};
pub use transcript::{Transcript, TranscriptEntry};

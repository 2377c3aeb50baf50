//! Orchestration use cases

pub mod host_override;
pub mod manual_ask;
pub mod reset_sessions;
pub mod run_debate;
pub mod shared;

#[cfg(test)]
pub(crate) mod testing;

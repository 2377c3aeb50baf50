//! Interactive chat mode

pub mod repl;

pub use repl::DebateRepl;

//! Presentation layer for strata-council
//!
//! This crate contains CLI definitions, output formatters, progress
//! reporters, and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::DebateRepl;
pub use cli::commands::{Cli, OutputFormat};
pub use output::{ConsoleFormatter, ConsoleReportRenderer};
pub use progress::{ProgressReporter, SimpleProgress};

//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for deliberation results
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Full transcript plus the final verdict
    Full,
    /// Only the final verdict
    Verdict,
    /// JSON output (outcome and transcript)
    Json,
}

/// CLI arguments for strata-council
#[derive(Parser, Debug)]
#[command(name = "strata-council")]
#[command(author, version, about = "Expert council - domain agents debate a geological query")]
#[command(long_about = r#"
Strata Council runs a panel of knowledge-base agents through a moderated
debate over a geological query.

The process:
1. Fan-Out: every expert answers the query in parallel
2. Audit rounds: a moderator interrogates the weakest claims, dispatching
   follow-up questions to individual experts
3. Verdict: the moderator closes with a mineralization prediction report
   or a knowledge summary

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./council.toml      Project-level config
3. ~/.config/strata-council/config.toml   Global config

Example:
  strata-council "东秦岭钼矿带成矿概率如何?"
  strata-council --context-file survey_notes.txt "Assess the western anomaly"
  strata-council --chat
"#)]
pub struct Cli {
    /// The query to put before the panel (not required in chat mode)
    pub query: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Load a reference document injected into every prompt
    #[arg(long, value_name = "PATH")]
    pub context_file: Option<PathBuf>,

    /// Cap on moderator rounds (overrides configuration)
    #[arg(long, value_name = "N")]
    pub max_rounds: Option<u32>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "verdict")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

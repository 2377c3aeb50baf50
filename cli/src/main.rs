//! CLI entrypoint for Strata Council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use council_application::{DebateParams, DebateState, RunDebateInput, RunDebateUseCase};
use council_infrastructure::{ConfigLoader, HttpAgentGateway};
use council_presentation::{
    Cli, ConsoleFormatter, ConsoleReportRenderer, DebateRepl, OutputFormat, ProgressReporter,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // Load and validate configuration
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("failed to load configuration")?
    };
    config.validate().context("invalid configuration")?;

    let mut params = config.params();
    if let Some(max_rounds) = cli.max_rounds {
        params = DebateParams::new(max_rounds, params.round_delay);
    }

    info!(
        "starting strata-council with {} panel members",
        config.registry().len()
    );

    // === Dependency Injection ===
    let gateway = Arc::new(HttpAgentGateway::new(config.service_settings())?);
    let state = DebateState::new(config.registry(), params.max_rounds).into_shared();

    // Optional global reference document
    if let Some(path) = &cli.context_file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read context file {}", path.display()))?;
        state.lock().await.session.set_file_context(Some(content));
    }

    // Chat mode
    if cli.chat {
        let repl = DebateRepl::new(gateway, state, params).with_progress(!cli.quiet);
        repl.run().await?;
        return Ok(());
    }

    // Single deliberation mode - a query is required
    let query = match cli.query {
        Some(q) => q,
        None => bail!("A query is required. Use --chat for interactive mode."),
    };

    if !cli.quiet {
        println!();
        println!("+============================================================+");
        println!("|              Strata Council - Expert Panel                 |");
        println!("+============================================================+");
        println!();
        println!("Query: {query}");
        println!();
    }

    let use_case = RunDebateUseCase::new(gateway, Arc::clone(&state), params)
        .with_renderer(Arc::new(ConsoleReportRenderer));

    let outcome = if cli.quiet {
        use_case.execute(RunDebateInput::new(&query)).await?
    } else {
        let progress = ProgressReporter::new();
        use_case
            .execute_with_progress(RunDebateInput::new(&query), &progress)
            .await?
    };

    // Snapshot the transcript for output; the deliberation is over, so the
    // lock is free
    let transcript: Vec<_> = state.lock().await.transcript.entries().to_vec();

    let output = match cli.output {
        OutputFormat::Full => ConsoleFormatter::format(&query, &transcript, &outcome),
        OutputFormat::Verdict => ConsoleFormatter::format_verdict_only(&outcome),
        OutputFormat::Json => ConsoleFormatter::format_json(&transcript, &outcome),
    };

    println!("{output}");

    Ok(())
}

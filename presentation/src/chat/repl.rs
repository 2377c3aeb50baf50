//! REPL (Read-Eval-Print Loop) for interactive deliberation

use crate::output::{ConsoleFormatter, ConsoleReportRenderer};
use crate::progress::ProgressReporter;
use colored::Colorize;
use council_application::{
    AgentGateway, DebateParams, HostOverrideUseCase, ManualAskInput, ManualAskUseCase, NoProgress,
    ResetSessionsUseCase, RunDebateInput, RunDebateUseCase, SharedState,
};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;
use std::sync::Arc;

/// Interactive deliberation REPL
pub struct DebateRepl<G: AgentGateway + 'static> {
    run_debate: RunDebateUseCase<G>,
    manual_ask: ManualAskUseCase<G>,
    host_override: HostOverrideUseCase<G>,
    reset_sessions: ResetSessionsUseCase<G>,
    state: SharedState,
    show_progress: bool,
}

impl<G: AgentGateway + 'static> DebateRepl<G> {
    pub fn new(gateway: Arc<G>, state: SharedState, params: DebateParams) -> Self {
        Self {
            run_debate: RunDebateUseCase::new(Arc::clone(&gateway), Arc::clone(&state), params)
                .with_renderer(Arc::new(ConsoleReportRenderer)),
            manual_ask: ManualAskUseCase::new(Arc::clone(&gateway), Arc::clone(&state)),
            host_override: HostOverrideUseCase::new(Arc::clone(&gateway), Arc::clone(&state)),
            reset_sessions: ResetSessionsUseCase::new(gateway, Arc::clone(&state)),
            state,
            show_progress: true,
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = Self::history_path();
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome().await;

        loop {
            match rl.readline(">>> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(line);

                    if line.starts_with('/') {
                        if self.handle_command(line).await {
                            break;
                        }
                        continue;
                    }

                    self.process_query(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {err:?}");
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn history_path() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("strata-council").join("history.txt"))
    }

    async fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│          Strata Council - Chat Mode         │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        self.print_panel().await;
        println!("Commands:");
        println!("  /help              - Show this help");
        println!("  /panel             - Show the panel");
        println!("  /ask <key> [query] - Question one expert directly");
        println!("  /override <text>   - Steer the moderator");
        println!("  /file <path>|off   - Load or drop the reference document");
        println!("  /reset             - Fresh sessions, empty transcript");
        println!("  /quit              - Exit chat");
        println!();
    }

    /// Handle slash commands. Returns true if the REPL should exit.
    async fn handle_command(&self, line: &str) -> bool {
        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                return true;
            }
            "/help" | "/h" | "/?" => {
                println!();
                println!("Type a query to put it before the whole panel.");
                println!();
                println!("  /help, /h, /?      - Show this help");
                println!("  /panel             - Show the panel and session state");
                println!("  /ask <key> [query] - Question one expert directly");
                println!("  /override <text>   - Inject a moderator instruction");
                println!("  /file <path>       - Load a reference document");
                println!("  /file off          - Stop injecting the document");
                println!("  /reset             - Fresh sessions, empty transcript");
                println!("  /quit, /exit, /q   - Exit chat");
                println!();
            }
            "/panel" => self.print_panel().await,
            "/reset" => self.do_reset().await,
            "/ask" => self.do_ask(rest).await,
            "/override" => self.do_override(rest).await,
            "/file" => self.do_file(rest).await,
            _ => {
                println!("Unknown command: {cmd}");
                println!("Type /help for available commands");
            }
        }
        false
    }

    async fn print_panel(&self) {
        let Ok(state) = self.state.try_lock() else {
            eprintln!("Busy: a deliberation is still running.");
            return;
        };
        println!("Panel:");
        for key in state.registry.keys() {
            let name = state.registry.display_name(key).unwrap_or(key);
            let session = if state.registry.session(key).is_some() {
                "session open"
            } else {
                "no session"
            };
            let role = if key == state.registry.moderator_key() {
                " (moderator)"
            } else {
                ""
            };
            println!("  - {key}: {name}{role} [{session}]");
        }
        println!(
            "Reference document: {}",
            if state.session.file_context_enabled() {
                "active"
            } else {
                "off"
            }
        );
        println!();
    }

    async fn do_reset(&self) {
        match self.reset_sessions.execute().await {
            Ok(report) => println!(
                "{}",
                format!(
                    "Panel reset: {}/{} sessions refreshed, transcript cleared.",
                    report.refreshed, report.total
                )
                .green()
            ),
            Err(e) => eprintln!("Error: {e}"),
        }
    }

    async fn do_ask(&self, rest: &str) {
        let (key, query) = match rest.split_once(char::is_whitespace) {
            Some((key, query)) => (key, query.trim()),
            None => (rest, ""),
        };
        if key.is_empty() {
            eprintln!("Usage: /ask <key> [query]");
            return;
        }

        let input = ManualAskInput::new(key, query);
        let result = if self.show_progress {
            let progress = ProgressReporter::new();
            self.manual_ask.execute_with_progress(input, &progress).await
        } else {
            self.manual_ask.execute_with_progress(input, &NoProgress).await
        };
        if let Err(e) = result {
            eprintln!("Error: {e}");
        }
    }

    async fn do_override(&self, instruction: &str) {
        let result = if self.show_progress {
            let progress = ProgressReporter::new();
            self.host_override
                .execute_with_progress(instruction, &progress)
                .await
        } else {
            self.host_override
                .execute_with_progress(instruction, &NoProgress)
                .await
        };
        if let Err(e) = result {
            eprintln!("Error: {e}");
        }
    }

    async fn do_file(&self, rest: &str) {
        if rest.is_empty() {
            eprintln!("Usage: /file <path> or /file off");
            return;
        }

        let Ok(mut state) = self.state.try_lock() else {
            eprintln!("Busy: a deliberation is still running.");
            return;
        };

        if rest.eq_ignore_ascii_case("off") {
            state.session.set_file_context_enabled(false);
            println!("Reference document disabled.");
            return;
        }

        match std::fs::read_to_string(rest) {
            Ok(content) => {
                let bytes = content.len();
                state.session.set_file_context(Some(content));
                println!("Loaded reference document '{rest}' ({bytes} bytes).");
            }
            Err(e) => eprintln!("Could not read '{rest}': {e}"),
        }
    }

    async fn process_query(&self, query: &str) {
        println!();

        let input = RunDebateInput::new(query);
        let result = if self.show_progress {
            let progress = ProgressReporter::new();
            self.run_debate.execute_with_progress(input, &progress).await
        } else {
            self.run_debate.execute(input).await
        };

        match result {
            Ok(outcome) => {
                println!("{}", ConsoleFormatter::format_verdict_only(&outcome));
            }
            Err(e) => {
                eprintln!("Error: {e}");
            }
        }
        println!();
    }
}

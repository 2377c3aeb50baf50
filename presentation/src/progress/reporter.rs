//! Progress reporting for deliberation runs

use colored::Colorize;
use council_application::ports::progress::{DebatePhase, DebateProgress};
use council_domain::TranscriptEntry;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

use crate::output::ConsoleFormatter;

/// Reports deliberation progress with progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn println(&self, line: String) {
        let _ = self.multi.println(line);
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DebateProgress for ProgressReporter {
    fn on_phase_start(&self, phase: DebatePhase, total: usize) {
        let pb = self.multi.add(ProgressBar::new(total as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(phase.display_name());
        pb.set_message("starting...");

        if let Ok(mut slot) = self.phase_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_expert_settled(&self, key: &str, success: bool) {
        if let Ok(slot) = self.phase_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), key)
            } else {
                format!("{} {} (abstained)", "x".red(), key)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_phase_complete(&self, phase: DebatePhase) {
        if let Ok(mut slot) = self.phase_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(format!("{} complete", phase.display_name().green()));
        }
    }

    fn on_round_start(&self, round: u32, max_rounds: u32) {
        self.println(format!(
            "{}",
            format!("-- Moderator round {round}/{max_rounds} --")
                .cyan()
                .bold()
        ));
    }

    fn on_follow_up(&self, key: &str, question: &str) {
        self.println(format!(
            "{} {} {}",
            "->".cyan(),
            format!("asking {key}:").bold(),
            question
        ));
    }

    fn on_entry(&self, entry: &TranscriptEntry) {
        self.println(format!(
            "\n{}\n{}",
            ConsoleFormatter::entry_header(entry).yellow().bold(),
            entry.content
        ));
    }

    fn on_note(&self, note: &str) {
        self.println(format!("{}", note.dimmed()));
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl DebateProgress for SimpleProgress {
    fn on_phase_start(&self, phase: DebatePhase, total: usize) {
        println!(
            "{} {} ({} calls)",
            "->".cyan(),
            phase.display_name().bold(),
            total
        );
    }

    fn on_expert_settled(&self, key: &str, success: bool) {
        if success {
            println!("  {} {}", "v".green(), key);
        } else {
            println!("  {} {} (abstained)", "x".red(), key);
        }
    }

    fn on_phase_complete(&self, _phase: DebatePhase) {
        println!();
    }

    fn on_round_start(&self, round: u32, max_rounds: u32) {
        println!("-- Moderator round {round}/{max_rounds} --");
    }

    fn on_follow_up(&self, key: &str, question: &str) {
        println!("-> asking {key}: {question}");
    }

    fn on_entry(&self, entry: &TranscriptEntry) {
        println!(
            "\n{}\n{}",
            ConsoleFormatter::entry_header(entry),
            entry.content
        );
    }

    fn on_note(&self, note: &str) {
        println!("{note}");
    }
}

//! Console output formatter for deliberation results

use colored::Colorize;
use council_domain::{DebateOutcome, TranscriptEntry};

/// Formats deliberation results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete result: query, transcript, verdict
    pub fn format(query: &str, transcript: &[TranscriptEntry], outcome: &DebateOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Strata Council Deliberation"));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Query:".cyan().bold(), query));

        output.push_str(&Self::section_header("Transcript"));
        for entry in transcript {
            output.push_str(&format!(
                "\n{}\n{}\n",
                Self::entry_header(entry).yellow().bold(),
                entry.content
            ));
        }

        output.push_str(&Self::section_header("Verdict"));
        output.push('\n');
        output.push_str(&Self::verdict_body(outcome));
        output.push('\n');

        output.push_str(&format!(
            "\n{} {} round(s), ended {}\n",
            "Rounds:".dimmed(),
            outcome.rounds,
            outcome.status.as_str()
        ));

        output.push_str(&Self::footer());
        output
    }

    /// Format the verdict only (concise output)
    pub fn format_verdict_only(outcome: &DebateOutcome) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n\n", "=== Council Verdict ===".cyan().bold()));
        output.push_str(&Self::verdict_body(outcome));
        output.push('\n');
        output.push_str(&format!(
            "{}\n",
            format!(
                "({} round(s), ended {})",
                outcome.rounds,
                outcome.status.as_str()
            )
            .dimmed()
        ));
        output
    }

    /// Format as JSON (outcome plus transcript)
    pub fn format_json(transcript: &[TranscriptEntry], outcome: &DebateOutcome) -> String {
        let value = serde_json::json!({
            "outcome": outcome,
            "transcript": transcript,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Header line for a single transcript entry
    pub fn entry_header(entry: &TranscriptEntry) -> String {
        match entry.participant_key.as_deref() {
            Some(key) => format!("── {} ({}) ──", entry.role, key),
            None => format!("── {} ──", entry.role),
        }
    }

    fn verdict_body(outcome: &DebateOutcome) -> String {
        outcome
            .verdict_text()
            .unwrap_or_else(|| "Round cap reached without an explicit verdict.".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{DebateStatus, FinalVerdict};

    fn outcome(verdict: Option<FinalVerdict>) -> DebateOutcome {
        DebateOutcome {
            rounds: 2,
            status: DebateStatus::Finished,
            verdict,
        }
    }

    #[test]
    fn test_verdict_only_with_text() {
        colored::control::set_override(false);
        let out = ConsoleFormatter::format_verdict_only(&outcome(Some(FinalVerdict::Text(
            "porphyry target confirmed".to_string(),
        ))));
        assert!(out.contains("porphyry target confirmed"));
        assert!(out.contains("(2 round(s), ended finished)"));
    }

    #[test]
    fn test_verdict_only_without_verdict() {
        colored::control::set_override(false);
        let out = ConsoleFormatter::format_verdict_only(&outcome(None));
        assert!(out.contains("Round cap reached"));
    }

    #[test]
    fn test_json_includes_transcript() {
        let mut transcript = Vec::new();
        transcript.push(TranscriptEntry {
            sequence: 0,
            role: "User".to_string(),
            participant_key: None,
            content: "q".to_string(),
        });
        let out = ConsoleFormatter::format_json(&transcript, &outcome(None));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["transcript"][0]["role"], "User");
        assert_eq!(value["outcome"]["rounds"], 2);
    }
}

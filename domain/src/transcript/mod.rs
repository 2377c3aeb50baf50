//! Append-only deliberation transcript
//!
//! Every non-system contribution lands here in arrival order. System
//! notices (loading hints, failure notes) are deliberately kept out so the
//! rendered transcript stays a faithful prompt context.

use serde::{Deserialize, Serialize};

/// A single contribution (Entity). Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Strictly increasing position within the transcript
    pub sequence: u64,
    /// Display role of the author ("User", expert display name, ...)
    pub role: String,
    /// Registry key of the author, absent for user contributions
    pub participant_key: Option<String>,
    pub content: String,
}

/// Ordered log of all contributions
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a contribution, assigning the next sequence number.
    pub fn append(
        &mut self,
        role: impl Into<String>,
        participant_key: Option<&str>,
        content: impl Into<String>,
    ) {
        let sequence = self.entries.len() as u64;
        self.entries.push(TranscriptEntry {
            sequence,
            role: role.into(),
            participant_key: participant_key.map(str::to_string),
            content: content.into(),
        });
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the transcript into a prompt-ready string.
    ///
    /// Pure and deterministic: rendering twice with no appends in between is
    /// byte-identical. Each entry is written as `【role (ID: key)】:` with the
    /// content on the following line; entries are joined by blank lines.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                let id = entry
                    .participant_key
                    .as_deref()
                    .map(|key| format!(" (ID: {key})"))
                    .unwrap_or_default();
                format!("【{}{}】:\n{}", entry.role, id, entry.content)
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_strictly_increasing() {
        let mut t = Transcript::new();
        t.append("User", None, "q");
        t.append("Geophysics Expert", Some("geophysical"), "a1");
        t.append("Moderator", Some("host"), "a2");

        let seqs: Vec<_> = t.entries().iter().map(|e| e.sequence).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
    }

    #[test]
    fn test_render_format() {
        let mut t = Transcript::new();
        t.append("User", None, "Where is the ore body?");
        t.append("Geophysics Expert", Some("geophysical"), "Around 600m.");

        assert_eq!(
            t.render(),
            "【User】:\nWhere is the ore body?\n\n\
             【Geophysics Expert (ID: geophysical)】:\nAround 600m."
        );
    }

    #[test]
    fn test_render_idempotent() {
        let mut t = Transcript::new();
        t.append("User", None, "q");
        t.append("General Geology Expert", Some("general"), "a");

        let first = t.render();
        let second = t.render();
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(Transcript::new().render(), "");
    }
}

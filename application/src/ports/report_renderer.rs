//! Report renderer port
//!
//! Turns a structured verdict into the display artifact that becomes the
//! final `host` transcript entry. The console card lives in the
//! presentation layer; [`PlainReportRenderer`] is the dependency-free
//! default.

use council_domain::ReportPayload;

/// Renders a structured verdict into display text
pub trait ReportRenderer: Send + Sync {
    fn render(&self, report: &ReportPayload) -> String;
}

/// Minimal text rendering, used as the default and in tests
pub struct PlainReportRenderer;

impl ReportRenderer for PlainReportRenderer {
    fn render(&self, report: &ReportPayload) -> String {
        match report {
            ReportPayload::Prediction {
                probability,
                target_zones,
                interpretation,
                next_steps,
                ..
            } => format!(
                "Mineralization assessment\n\
                 Probability: {probability}\n\
                 Favorable zones: {target_zones}\n\
                 Interpretation: {interpretation}\n\
                 Next steps: {next_steps}"
            ),
            ReportPayload::General {
                summary,
                key_points,
                evidence,
            } => format!(
                "Deliberation summary\n\
                 Conclusion: {summary}\n\
                 Key points: {key_points}\n\
                 Supporting data: {evidence}"
            ),
        }
    }
}

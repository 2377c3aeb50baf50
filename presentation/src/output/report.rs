//! Console report card renderer
//!
//! Renders the structured verdict into the card text that becomes the last
//! `host` transcript entry. The card is plain text on purpose: it is fed
//! back into later prompts, so no ANSI escapes belong in it.

use council_application::ReportRenderer;
use council_domain::{ProbabilityGrade, ReportPayload};

const CARD_WIDTH: usize = 48;

/// Renders verdicts as bordered report cards
pub struct ConsoleReportRenderer;

impl ConsoleReportRenderer {
    fn grade_badge(grade: ProbabilityGrade) -> &'static str {
        match grade {
            ProbabilityGrade::High => "[HIGH]",
            ProbabilityGrade::Medium => "[MEDIUM]",
            ProbabilityGrade::Low => "[LOW]",
            ProbabilityGrade::Unknown => "[UNRATED]",
        }
    }

    fn card(title: &str, fields: &[(&str, &str)]) -> String {
        let mut out = String::new();
        out.push_str(&"=".repeat(CARD_WIDTH));
        out.push('\n');
        out.push_str(title);
        out.push('\n');
        out.push_str(&"-".repeat(CARD_WIDTH));
        for (label, value) in fields {
            out.push('\n');
            out.push_str(&format!("{label}: {value}"));
        }
        out.push('\n');
        out.push_str(&"=".repeat(CARD_WIDTH));
        out
    }
}

impl ReportRenderer for ConsoleReportRenderer {
    fn render(&self, report: &ReportPayload) -> String {
        match report {
            ReportPayload::Prediction {
                probability,
                grade,
                target_zones,
                interpretation,
                next_steps,
            } => Self::card(
                &format!("Mineralization Prediction {}", Self::grade_badge(*grade)),
                &[
                    ("Probability", probability),
                    ("Favorable zones", target_zones),
                    ("Interpretation", interpretation),
                    ("Next steps", next_steps),
                ],
            ),
            ReportPayload::General {
                summary,
                key_points,
                evidence,
            } => Self::card(
                "Deliberation Summary",
                &[
                    ("Conclusion", summary),
                    ("Key points", key_points),
                    ("Supporting data", evidence),
                ],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prediction_card_has_badge_and_fields() {
        let map = json!({
            "成矿概率": "高",
            "有利部位": "NE fault intersection",
            "成矿解释": "skarn halo",
            "下一步建议": "drill section 3",
        });
        let report = ReportPayload::classify(map.as_object().unwrap());
        let card = ConsoleReportRenderer.render(&report);
        assert!(card.contains("Mineralization Prediction [HIGH]"));
        assert!(card.contains("Probability: 高"));
        assert!(card.contains("Next steps: drill section 3"));
        // the card is re-fed into prompts, so it must carry no escapes
        assert!(!card.contains('\u{1b}'));
    }

    #[test]
    fn test_general_card() {
        let map = json!({
            "研讨总结": "stratabound control",
            "关键知识点": "carbonate host",
        });
        let report = ReportPayload::classify(map.as_object().unwrap());
        let card = ConsoleReportRenderer.render(&report);
        assert!(card.contains("Deliberation Summary"));
        assert!(card.contains("Conclusion: stratabound control"));
        assert!(card.contains("Supporting data: expert knowledge base"));
    }
}

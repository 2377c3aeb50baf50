//! Structured verdict payloads
//!
//! A structured `FINISH` object is one of two schemas, told apart by the
//! presence of the mineralization-probability key. The key names are part
//! of the moderator wire protocol and must match the upstream agents
//! byte-for-byte, hence the Chinese literals.

use serde::Serialize;
use serde_json::{Map, Value};

/// Prediction schema keys (wire-exact)
pub const KEY_PROBABILITY: &str = "成矿概率";
pub const KEY_TARGET_ZONES: &str = "有利部位";
pub const KEY_INTERPRETATION: &str = "成矿解释";
pub const KEY_NEXT_STEPS: &str = "下一步建议";

/// General schema keys (wire-exact), with the English fallbacks some
/// moderator models emit instead
pub const KEY_SUMMARY: &str = "研讨总结";
pub const KEY_POINTS: &str = "关键知识点";
pub const KEY_EVIDENCE: &str = "数据支撑";

/// Coarse mineralization probability grade parsed from the verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilityGrade {
    High,
    Medium,
    Low,
    Unknown,
}

impl ProbabilityGrade {
    /// Grade from the free-form probability field (contains-based, the
    /// field is usually "高", "中" or "低" but models pad it with prose)
    pub fn from_field(value: &str) -> Self {
        if value.contains('高') {
            ProbabilityGrade::High
        } else if value.contains('中') {
            ProbabilityGrade::Medium
        } else if value.contains('低') {
            ProbabilityGrade::Low
        } else {
            ProbabilityGrade::Unknown
        }
    }
}

/// Classified structured verdict
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ReportPayload {
    /// Mineralization prediction verdict
    Prediction {
        probability: String,
        grade: ProbabilityGrade,
        target_zones: String,
        interpretation: String,
        next_steps: String,
    },
    /// General geology / knowledge-survey verdict
    General {
        summary: String,
        key_points: String,
        evidence: String,
    },
}

impl ReportPayload {
    /// Classify a structured `FINISH` object by key presence.
    pub fn classify(map: &Map<String, Value>) -> Self {
        if map.contains_key(KEY_PROBABILITY) {
            let probability = field(map, KEY_PROBABILITY, None, "unknown");
            ReportPayload::Prediction {
                grade: ProbabilityGrade::from_field(&probability),
                probability,
                target_zones: field(map, KEY_TARGET_ZONES, None, "not specified"),
                interpretation: field(map, KEY_INTERPRETATION, None, "no interpretation given"),
                next_steps: field(map, KEY_NEXT_STEPS, None, "no recommendation"),
            }
        } else {
            ReportPayload::General {
                summary: field(map, KEY_SUMMARY, Some("summary"), "no summary"),
                key_points: field(map, KEY_POINTS, Some("key_points"), "none"),
                evidence: field(map, KEY_EVIDENCE, Some("reference"), "expert knowledge base"),
            }
        }
    }

    pub fn is_prediction(&self) -> bool {
        matches!(self, ReportPayload::Prediction { .. })
    }
}

/// Extract a field as text, stringifying non-string values rather than
/// dropping them.
fn field(map: &Map<String, Value>, key: &str, fallback_key: Option<&str>, default: &str) -> String {
    let value = map
        .get(key)
        .or_else(|| fallback_key.and_then(|k| map.get(k)));
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => default.to_string(),
    }
}

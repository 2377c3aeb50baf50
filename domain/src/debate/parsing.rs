//! Moderator reply parsing
//!
//! Decoding a moderator reply is an ordered list of strategies, each
//! producing the same [`Command`] type:
//!
//! 1. Strip markdown code fences and attempt a strict JSON decode.
//! 2. On failure, retry the decode on the first-`{`-to-last-`}` substring
//!    (handles prose wrapped around the JSON).
//! 3. On continued failure, fall back to the line grammar
//!    `CMD: ASK <target> <free text>` (case-insensitive) or the literal
//!    `CMD: FINISH` marker.
//! 4. Otherwise the reply is [`Command::Malformed`].
//!
//! Pure domain logic: no I/O, no session state, just text.

use crate::debate::command::{Command, FinishPayload};
use serde_json::Value;

/// Decode a raw moderator reply into exactly one [`Command`].
pub fn parse_moderator_reply(reply: &str) -> Command {
    let stripped = strip_code_fences(reply);

    if let Some(command) = try_strict_json(&stripped, reply) {
        return command;
    }
    if let Some(command) = try_brace_recovery(&stripped, reply) {
        return command;
    }
    if let Some(command) = try_line_grammar(reply) {
        return command;
    }

    Command::Malformed {
        raw: reply.to_string(),
    }
}

/// Remove ```json / ``` fence markers wherever they appear.
fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Strategy 1: the whole (fence-stripped) text is a JSON command object.
fn try_strict_json(stripped: &str, raw: &str) -> Option<Command> {
    let value = serde_json::from_str::<Value>(stripped).ok()?;
    interpret_value(&value, raw)
}

/// Strategy 2: locate the outermost brace pair and decode that substring.
fn try_brace_recovery(stripped: &str, raw: &str) -> Option<Command> {
    let start = stripped.find('{')?;
    let end = stripped.rfind('}')?;
    if end <= start {
        return None;
    }
    let value = serde_json::from_str::<Value>(&stripped[start..=end]).ok()?;
    interpret_value(&value, raw)
}

/// Interpret a decoded JSON value as a command object.
///
/// Returns `None` when the value is not a command-shaped object at all
/// (letting later strategies run) and `Some(Malformed)` when it is a
/// command object that violates the protocol, e.g. an `ASK` without a
/// target or an unknown action.
fn interpret_value(value: &Value, raw: &str) -> Option<Command> {
    let object = value.as_object()?;
    let action = object.get("action")?.as_str()?;

    let malformed = || {
        Some(Command::Malformed {
            raw: raw.to_string(),
        })
    };

    if action.eq_ignore_ascii_case("ASK") {
        let Some(target) = object.get("target").and_then(Value::as_str) else {
            return malformed();
        };
        if target.trim().is_empty() {
            return malformed();
        }
        let content = object
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or_default();
        return Some(Command::Ask {
            target: target.trim().to_string(),
            content: content.trim().to_string(),
        });
    }

    if action.eq_ignore_ascii_case("FINISH") {
        return match object.get("content") {
            Some(Value::String(text)) => Some(Command::Finish {
                payload: FinishPayload::Text(text.clone()),
            }),
            Some(Value::Object(map)) => Some(Command::Finish {
                payload: FinishPayload::Report(map.clone()),
            }),
            _ => malformed(),
        };
    }

    malformed()
}

/// Strategy 3: plain-text fallback grammar.
///
/// An `ASK` line wins over a `FINISH` marker when both are present,
/// mirroring the strict form where a reply carries one instruction.
fn try_line_grammar(text: &str) -> Option<Command> {
    for line in text.lines() {
        let Some(rest) = strip_prefix_ignore_case(line.trim(), "CMD:") else {
            continue;
        };
        let Some(rest) = strip_prefix_ignore_case(rest.trim_start(), "ASK") else {
            continue;
        };
        // "ASK" must be a whole word followed by a target
        if !rest.starts_with(char::is_whitespace) {
            continue;
        }
        let mut words = rest.split_whitespace();
        let Some(target) = words.next() else {
            continue;
        };
        let content = rest
            .trim_start()
            .strip_prefix(target)
            .unwrap_or_default()
            .trim();
        if content.is_empty() {
            continue;
        }
        return Some(Command::Ask {
            target: target.to_string(),
            content: content.to_string(),
        });
    }

    const FINISH_MARKER: &str = "CMD: FINISH";
    if let Some(at) = text.find(FINISH_MARKER) {
        let mut payload = String::new();
        payload.push_str(&text[..at]);
        payload.push_str(&text[at + FINISH_MARKER.len()..]);
        return Some(Command::Finish {
            payload: FinishPayload::Text(payload.trim().to_string()),
        });
    }

    None
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        text.get(prefix.len()..)
    } else {
        None
    }
}

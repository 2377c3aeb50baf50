//! Prompt templates for the deliberation flow
//!
//! The moderator instruction embeds the wire protocol verbatim: the strict
//! JSON command forms and both FINISH schemas. Changing those literals
//! breaks the contract with [`crate::debate::parsing`] and
//! [`crate::report`].

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Opening prompt broadcast to every expert during fan-out
    pub fn opening_query(query: &str) -> String {
        format!(
            "User question: {query}\n\
             Answer strictly from your own specialist knowledge base. Give your \
             independent analysis; do not speculate about what other experts might say."
        )
    }

    /// The fixed per-round moderator instruction, with the rendered
    /// transcript appended
    pub fn moderator_round(transcript: &str, expert_keys: &[&str]) -> String {
        format!(
            r#"You are the moderator of an expert deliberation on a geological question.

[Task] Audit the discussion so far. If claims conflict or lack evidence, press a specific expert; if the conclusions are clear, summarize.
Your goal is to surface the deepest geological reasoning.
When the experts name different prospective zones for a prediction task, interrogate the disagreement and demand a justified reconciliation.
1. Identify the WEAKEST or LEAST-EVIDENCED claim made so far.
2. Direct one expert to back it with concrete cases or data.
3. Ask one expert at a time, but ask at least two follow-up questions in total before concluding.
For non-prediction tasks, analyze and summarize normally, but still press on any conflict.

[Follow-up policy]
- Do not accept vague answers.

[Summary policy]
- Summaries must be as detailed and complete as possible.

[Decision]
1. If this is a mineralization-prediction / prospecting task: on FINISH emit JSON schema A.
2. If this is a general-geology / knowledge / lookup task: on FINISH emit JSON schema B.

[Output format] Strict JSON only:
{{"action": "ASK", "target": "expert_key", "content": "question"}}
OR
{{"action": "FINISH", "content": JSON_OBJECT}}

JSON_OBJECT schemas:
[Schema A - prediction]: {{"成矿概率": "高/中/低", "有利部位": "...", "成矿解释": "...", "下一步建议": "..."}}
[Schema B - general]: {{"研讨总结": "...", "关键知识点": "...", "数据支撑": "..."}}

[Expert keys] {keys}
History:
{transcript}"#,
            keys = expert_keys.join(", "),
        )
    }

    /// Follow-up prompt dispatched to the expert the moderator named
    pub fn follow_up(content: &str) -> String {
        format!("Moderator follow-up: {content}")
    }

    /// Visible transcript marker for a follow-up the moderator issued
    pub fn follow_up_marker(display_name: &str, content: &str) -> String {
        format!("(follow-up to {display_name}) {content}")
    }

    /// Manual, out-of-loop question to a single expert
    pub fn manual(query: &str, transcript: &str) -> String {
        format!("User question: {query}\nHistory:\n{transcript}")
    }

    /// Manual trigger with no query: the expert speaks to the history alone
    pub fn manual_from_history(transcript: &str) -> String {
        format!(
            "Continue the deliberation based on the prior statements.\nHistory:\n{transcript}"
        )
    }

    /// One-shot host-override prompt wrapping a user instruction
    pub fn host_override(instruction: &str, transcript: &str) -> String {
        format!(
            r#"[HIGHEST PRIORITY INSTRUCTION] The user has intervened with a direct order:
"{instruction}"
Execute it immediately. Reply with the standard JSON instruction {{"action": "ASK"...}} or answer directly.
History for reference:
{transcript}"#
        )
    }

    /// Visible transcript marker for a dispatched override follow-up
    pub fn override_marker(display_name: &str, content: &str) -> String {
        format!("(override: follow-up to {display_name}) {content}")
    }

    /// Follow-up prompt used when the override dispatches to an expert
    pub fn override_follow_up(content: &str) -> String {
        format!(
            "The moderator, acting on a user intervention, asks you: {content}\n\
             Answer based on the prior statements."
        )
    }

    /// Append the global reference document to an outbound prompt
    pub fn with_file_context(prompt: &str, context: &str) -> String {
        format!(
            "{prompt}\n\n[Global reference material (user-supplied)]:\n{context}\n\n\
             (Combine this material with your own knowledge base when answering.)"
        )
    }
}

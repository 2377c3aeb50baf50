//! Host Override use case
//!
//! A one-shot moderator consultation outside the round loop: the user's
//! instruction is wrapped in a highest-priority prompt, the moderator is
//! called once (hidden), and a resolved `ASK` dispatches exactly one
//! follow-up. Anything else (`FINISH`, malformed, unresolvable target)
//! lands in the transcript as the moderator's raw reply. No round is
//! consumed and no active session is required.

use crate::ports::agent_gateway::{AgentGateway, GatewayError};
use crate::ports::progress::{DebateProgress, NoProgress};
use crate::use_cases::shared::{SharedState, dispatch_follow_up};
use council_domain::{Command, PromptTemplate, parse_moderator_reply};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur during a host override
#[derive(Error, Debug)]
pub enum HostOverrideError {
    #[error("instruction is empty")]
    EmptyInstruction,

    #[error("another operation is using the session")]
    Busy,

    #[error("moderator call failed: {0}")]
    ModeratorFailed(#[from] GatewayError),
}

/// Use case for the user's direct intervention into the deliberation
pub struct HostOverrideUseCase<G: AgentGateway + 'static> {
    gateway: Arc<G>,
    state: SharedState,
}

impl<G: AgentGateway + 'static> HostOverrideUseCase<G> {
    pub fn new(gateway: Arc<G>, state: SharedState) -> Self {
        Self { gateway, state }
    }

    pub async fn execute(&self, instruction: &str) -> Result<(), HostOverrideError> {
        self.execute_with_progress(instruction, &NoProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        instruction: &str,
        progress: &dyn DebateProgress,
    ) -> Result<(), HostOverrideError> {
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(HostOverrideError::EmptyInstruction);
        }

        let mut state = self.state.try_lock().map_err(|_| HostOverrideError::Busy)?;

        info!("host override issued");
        state.append_user(format!("(override) {instruction}"));
        state.notify_last(progress);

        let moderator = state.registry.moderator_key().to_string();
        let prompt = state.augmented(PromptTemplate::host_override(
            instruction,
            &state.transcript.render(),
        ));

        let session = state.registry.session(&moderator).cloned();
        let reply = self
            .gateway
            .complete(&moderator, &prompt, session.as_ref(), true)
            .await?;
        state.absorb_session(&moderator, reply.new_session.clone());

        match parse_moderator_reply(&reply.text) {
            Command::Ask { target, content } => {
                if let Some(key) = state.registry.resolve(&target).map(str::to_string) {
                    progress.on_follow_up(&key, &content);
                    let name = state
                        .registry
                        .display_name(&key)
                        .unwrap_or(key.as_str())
                        .to_string();
                    dispatch_follow_up(
                        self.gateway.as_ref(),
                        &mut state,
                        progress,
                        &key,
                        PromptTemplate::override_marker(&name, &content),
                        PromptTemplate::override_follow_up(&content),
                    )
                    .await;
                } else {
                    warn!("override named unknown target {:?}", target);
                    state.append_host(reply.text);
                    state.notify_last(progress);
                }
            }
            _ => {
                // Direct answer, verdict, or noise: the raw reply stands.
                state.append_host(reply.text);
                state.notify_last(progress);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{ScriptedGateway, ask, test_state};

    #[tokio::test]
    async fn test_override_dispatches_resolved_ask() {
        let gateway = ScriptedGateway::new()
            .with_reply("host", &ask("general", "revisit the stratigraphy"))
            .with_reply("general", "revised: Permian, not Triassic");
        let state = test_state(5);
        let use_case = HostOverrideUseCase::new(gateway.clone(), state.clone());

        use_case.execute("check the stratigraphy again").await.unwrap();

        // moderator was consulted hidden, the expert visibly
        assert_eq!(gateway.hidden_flags("host"), vec![true]);
        assert_eq!(gateway.hidden_flags("general"), vec![false]);

        let state = state.try_lock().unwrap();
        let last = state.transcript.last().unwrap();
        assert_eq!(last.participant_key.as_deref(), Some("general"));
        assert_eq!(last.content, "revised: Permian, not Triassic");
        // no round consumed
        assert_eq!(state.session.round(), 0);
    }

    #[tokio::test]
    async fn test_override_plain_reply_is_appended() {
        let gateway = ScriptedGateway::new().with_reply("host", "Understood, noted for the record.");
        let state = test_state(5);
        let use_case = HostOverrideUseCase::new(gateway, state.clone());

        use_case.execute("note my objection").await.unwrap();

        let state = state.try_lock().unwrap();
        let last = state.transcript.last().unwrap();
        assert_eq!(last.participant_key.as_deref(), Some("host"));
        assert_eq!(last.content, "Understood, noted for the record.");
    }

    #[tokio::test]
    async fn test_override_prose_wrapped_ask_recovers() {
        let reply = format!("Sure, I'll act on that. {}", ask("geophysical", "re-run the model"));
        let gateway = ScriptedGateway::new()
            .with_reply("host", &reply)
            .with_reply("geophysical", "model re-run complete");
        let state = test_state(5);
        let use_case = HostOverrideUseCase::new(gateway.clone(), state.clone());

        use_case.execute("make geophysics re-run the model").await.unwrap();

        assert_eq!(gateway.call_count("geophysical"), 1);
    }

    #[tokio::test]
    async fn test_override_empty_instruction_rejected() {
        let gateway = ScriptedGateway::new();
        let state = test_state(5);
        let use_case = HostOverrideUseCase::new(gateway.clone(), state);

        let err = use_case.execute("   ").await.unwrap_err();
        assert!(matches!(err, HostOverrideError::EmptyInstruction));
        assert_eq!(gateway.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_override_moderator_failure_surfaces() {
        let gateway = ScriptedGateway::new().with_failure("host");
        let state = test_state(5);
        let use_case = HostOverrideUseCase::new(gateway, state.clone());

        let err = use_case.execute("do something").await.unwrap_err();
        assert!(matches!(err, HostOverrideError::ModeratorFailed(_)));

        // session status untouched
        let state = state.try_lock().unwrap();
        assert!(!state.session.status().is_terminal());
    }
}

//! Manual Ask use case
//!
//! Bypasses the deliberation loop: one direct call to a named expert,
//! answering either the user's query or the transcript alone. Never touches
//! the round counter or session status; the shared lock keeps it from
//! overlapping a running loop.

use crate::ports::agent_gateway::AgentGateway;
use crate::ports::progress::{DebateProgress, NoProgress};
use crate::use_cases::shared::SharedState;
use council_domain::{PromptTemplate, Query};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur on a manual trigger
#[derive(Error, Debug)]
pub enum ManualAskError {
    #[error("another operation is using the session")]
    Busy,

    #[error("unknown participant: {0}")]
    UnknownParticipant(String),

    #[error("nothing to ask: no query and no history")]
    NothingToAsk,
}

/// Input for ManualAsk
#[derive(Debug, Clone)]
pub struct ManualAskInput {
    pub key: String,
    /// Optional steering query; absent means "speak to the history"
    pub query: Option<Query>,
}

impl ManualAskInput {
    pub fn new(key: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            query: Query::try_new(query),
        }
    }
}

/// Use case for manually triggering a single expert
pub struct ManualAskUseCase<G: AgentGateway + 'static> {
    gateway: Arc<G>,
    state: SharedState,
}

impl<G: AgentGateway + 'static> ManualAskUseCase<G> {
    pub fn new(gateway: Arc<G>, state: SharedState) -> Self {
        Self { gateway, state }
    }

    pub async fn execute(&self, input: ManualAskInput) -> Result<(), ManualAskError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// A transport failure or empty answer is an abstention, reported as a
    /// note; only validation problems are errors.
    pub async fn execute_with_progress(
        &self,
        input: ManualAskInput,
        progress: &dyn DebateProgress,
    ) -> Result<(), ManualAskError> {
        let mut state = self.state.try_lock().map_err(|_| ManualAskError::Busy)?;

        let key = state
            .registry
            .resolve(&input.key)
            .ok_or_else(|| ManualAskError::UnknownParticipant(input.key.clone()))?
            .to_string();

        if input.query.is_none() && state.transcript.is_empty() {
            return Err(ManualAskError::NothingToAsk);
        }

        info!("manual trigger for {}", key);

        let history = state.transcript.render();
        let prompt = match &input.query {
            Some(query) => PromptTemplate::manual(query.content(), &history),
            None => PromptTemplate::manual_from_history(&history),
        };
        let prompt = state.augmented(prompt);

        if let Some(query) = &input.query {
            state.append_user(format!("(targeted) {query}"));
            state.notify_last(progress);
        }

        let session = state.registry.session(&key).cloned();
        match self.gateway.complete(&key, &prompt, session.as_ref(), false).await {
            Ok(reply) if !reply.is_empty() => {
                state.record_reply(&key, reply);
                state.notify_last(progress);
            }
            Ok(reply) => {
                state.absorb_session(&key, reply.new_session);
                progress.on_note(&format!("{key} returned an empty answer"));
            }
            Err(e) => {
                warn!("manual call to {} failed: {}", key, e);
                progress.on_note(&format!("call to {key} failed: {e}"));
            }
        }

        Ok(())
    }
}

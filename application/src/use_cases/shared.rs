//! State shared by all use cases
//!
//! One [`DebateState`] exists per process, guarded by a tokio mutex. Every
//! use case takes the lock for its whole execution, which is the
//! single-writer discipline: the fan-out tasks themselves never touch the
//! state, they hand their results back to the lock holder.

use crate::ports::agent_gateway::{AgentGateway, AgentReply};
use crate::ports::progress::DebateProgress;
use council_domain::{
    DebateSession, ParticipantRegistry, PromptTemplate, SessionHandle, Transcript,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

/// Display role used for user contributions
pub const USER_ROLE: &str = "User";

/// The process-wide session, transcript, and panel registry
pub struct DebateState {
    pub session: DebateSession,
    pub transcript: Transcript,
    pub registry: ParticipantRegistry,
}

/// Shared handle over the debate state.
///
/// `try_lock` failure is surfaced as a "busy" rejection rather than queued,
/// so concurrent operations fail fast with no side effects.
pub type SharedState = Arc<Mutex<DebateState>>;

impl DebateState {
    pub fn new(registry: ParticipantRegistry, max_rounds: u32) -> Self {
        Self {
            session: DebateSession::new(max_rounds),
            transcript: Transcript::new(),
            registry,
        }
    }

    pub fn into_shared(self) -> SharedState {
        Arc::new(Mutex::new(self))
    }

    /// Apply the global reference document to an outbound prompt, when one
    /// is loaded and enabled
    pub fn augmented(&self, prompt: String) -> String {
        match self.session.effective_file_context() {
            Some(context) => PromptTemplate::with_file_context(&prompt, context),
            None => prompt,
        }
    }

    /// Store a replacement session handle when the reply carried one
    pub fn absorb_session(&mut self, key: &str, handle: Option<SessionHandle>) {
        if handle.is_some() {
            self.registry.set_session(key, handle);
        }
    }

    /// Record a settled expert answer: absorb the handle and append the
    /// answer under the participant's display name
    pub fn record_reply(&mut self, key: &str, reply: AgentReply) {
        self.absorb_session(key, reply.new_session.clone());
        let role = self
            .registry
            .display_name(key)
            .unwrap_or(key)
            .to_string();
        self.transcript.append(role, Some(key), reply.text);
    }

    /// Append a contribution under the moderator's identity
    pub fn append_host(&mut self, content: impl Into<String>) {
        let key = self.registry.moderator_key().to_string();
        let role = self
            .registry
            .display_name(&key)
            .unwrap_or(key.as_str())
            .to_string();
        self.transcript.append(role, Some(&key), content);
    }

    /// Append a user contribution
    pub fn append_user(&mut self, content: impl Into<String>) {
        self.transcript.append(USER_ROLE, None, content);
    }

    /// Echo the most recent transcript entry to the progress sink
    pub fn notify_last(&self, progress: &dyn DebateProgress) {
        if let Some(entry) = self.transcript.last() {
            progress.on_entry(entry);
        }
    }
}

/// Dispatch one follow-up to a resolved expert.
///
/// The moderator's question goes into the transcript as a host entry, then
/// the expert is called. A transport failure or empty answer is surfaced as
/// a visible note and swallowed: the loop proceeds with less context rather
/// than aborting.
pub(crate) async fn dispatch_follow_up<G: AgentGateway>(
    gateway: &G,
    state: &mut DebateState,
    progress: &dyn DebateProgress,
    key: &str,
    marker: String,
    prompt: String,
) {
    state.append_host(marker);
    state.notify_last(progress);

    let prompt = state.augmented(prompt);
    let session = state.registry.session(key).cloned();

    match gateway.complete(key, &prompt, session.as_ref(), false).await {
        Ok(reply) if !reply.is_empty() => {
            state.record_reply(key, reply);
            state.notify_last(progress);
        }
        Ok(reply) => {
            state.absorb_session(key, reply.new_session);
            progress.on_note(&format!("{key} returned an empty follow-up answer"));
        }
        Err(e) => {
            warn!("follow-up to {} failed: {}", key, e);
            progress.on_note(&format!("follow-up to {key} failed: {e}"));
        }
    }
}

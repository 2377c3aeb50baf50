//! Scripted gateway and fixtures shared by the use-case tests

use crate::ports::agent_gateway::{AgentGateway, AgentReply, GatewayError};
use crate::use_cases::shared::{DebateState, SharedState};
use async_trait::async_trait;
use council_domain::{Participant, ParticipantRegistry, SessionHandle};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Gateway whose answers are scripted per participant key.
///
/// Each key holds a queue of canned results consumed in order; an optional
/// repeating answer serves every call once the queue is drained.
pub(crate) struct ScriptedGateway {
    scripts: Mutex<HashMap<String, VecDeque<Result<String, GatewayError>>>>,
    repeating: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<(String, bool)>>,
}

impl ScriptedGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            scripts: Mutex::new(HashMap::new()),
            repeating: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn with_reply(self: Arc<Self>, key: &str, text: &str) -> Arc<Self> {
        self.push(key, Ok(text.to_string()));
        self
    }

    pub fn with_failure(self: Arc<Self>, key: &str) -> Arc<Self> {
        self.push(key, Err(GatewayError::Connection("scripted failure".to_string())));
        self
    }

    pub fn with_script<I, S>(self: Arc<Self>, key: &str, texts: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for text in texts {
            self.push(key, Ok(text.into()));
        }
        self
    }

    pub fn with_script_results(
        self: Arc<Self>,
        key: &str,
        results: Vec<Result<String, GatewayError>>,
    ) -> Arc<Self> {
        for result in results {
            self.push(key, result);
        }
        self
    }

    pub fn with_repeating(self: Arc<Self>, key: &str, text: &str) -> Arc<Self> {
        self.repeating
            .lock()
            .unwrap()
            .insert(key.to_string(), text.to_string());
        self
    }

    pub fn call_count(&self, key: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|(k, _)| k == key).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn hidden_flags(&self, key: &str) -> Vec<bool> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, hidden)| *hidden)
            .collect()
    }

    fn push(&self, key: &str, result: Result<String, GatewayError>) {
        self.scripts
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .push_back(result);
    }
}

#[async_trait]
impl AgentGateway for ScriptedGateway {
    async fn create_session(&self, key: &str) -> Result<Option<SessionHandle>, GatewayError> {
        Ok(Some(SessionHandle::new(format!("session-{key}"))))
    }

    async fn complete(
        &self,
        key: &str,
        _prompt: &str,
        _session: Option<&SessionHandle>,
        hidden: bool,
    ) -> Result<AgentReply, GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((key.to_string(), hidden));

        let scripted = self.scripts.lock().unwrap().get_mut(key).and_then(VecDeque::pop_front);
        if let Some(result) = scripted {
            return result.map(AgentReply::text_only);
        }
        if let Some(text) = self.repeating.lock().unwrap().get(key) {
            return Ok(AgentReply::text_only(text.clone()));
        }
        Ok(AgentReply::text_only(format!("scripted answer from {key}")))
    }
}

/// Fresh shared state with the standard two-expert test panel
pub(crate) fn test_state(max_rounds: u32) -> SharedState {
    let registry = ParticipantRegistry::new(
        vec![
            Participant::new("general", "General Geology Expert"),
            Participant::new("geophysical", "Geophysics Expert"),
        ],
        Participant::new("host", "Moderator"),
    );
    DebateState::new(registry, max_rounds).into_shared()
}

/// Strict-form ASK reply
pub(crate) fn ask(target: &str, content: &str) -> String {
    format!(r#"{{"action":"ASK","target":"{target}","content":"{content}"}}"#)
}

/// Strict-form FINISH reply with a string payload
pub(crate) fn finish_text(text: &str) -> String {
    format!(r#"{{"action":"FINISH","content":"{text}"}}"#)
}

/// Strict-form FINISH reply with a structured payload
pub(crate) fn finish_object(object: &str) -> String {
    format!(r#"{{"action":"FINISH","content":{object}}}"#)
}

//! Reset Sessions use case
//!
//! Recreates every participant's upstream conversation concurrently and
//! clears the transcript and round counter. A participant whose session
//! request fails simply continues stateless.

use crate::ports::agent_gateway::AgentGateway;
use crate::use_cases::shared::SharedState;
use council_domain::Transcript;
use futures::future::join_all;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur during a session reset
#[derive(Error, Debug)]
pub enum ResetSessionsError {
    #[error("another operation is using the session")]
    Busy,
}

/// Summary of a completed reset
#[derive(Debug, Clone, Copy)]
pub struct ResetReport {
    /// Participants that received a fresh handle
    pub refreshed: usize,
    pub total: usize,
}

/// Use case for resetting all upstream sessions
pub struct ResetSessionsUseCase<G: AgentGateway + 'static> {
    gateway: Arc<G>,
    state: SharedState,
}

impl<G: AgentGateway + 'static> ResetSessionsUseCase<G> {
    pub fn new(gateway: Arc<G>, state: SharedState) -> Self {
        Self { gateway, state }
    }

    pub async fn execute(&self) -> Result<ResetReport, ResetSessionsError> {
        let mut state = self.state.try_lock().map_err(|_| ResetSessionsError::Busy)?;

        let keys: Vec<String> = state.registry.keys().map(str::to_string).collect();
        let total = keys.len();

        let requests = keys.iter().map(|key| {
            let gateway = Arc::clone(&self.gateway);
            async move { (key.clone(), gateway.create_session(key).await) }
        });
        let results = join_all(requests).await;

        let mut refreshed = 0;
        for (key, result) in results {
            match result {
                Ok(handle) => {
                    if handle.is_some() {
                        refreshed += 1;
                    }
                    state.registry.set_session(&key, handle);
                }
                Err(e) => {
                    warn!("session reset for {} failed: {}", key, e);
                    state.registry.set_session(&key, None);
                }
            }
        }

        state.transcript = Transcript::new();
        state.session.reset();

        info!("sessions reset: {}/{} refreshed", refreshed, total);
        Ok(ResetReport { refreshed, total })
    }
}

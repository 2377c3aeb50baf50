//! Run Debate use case
//!
//! Drives the full deliberation: concurrent expert fan-out, then the
//! bounded moderator loop (audit round, command parse, optional dispatch)
//! until a verdict, a degraded ending, or the round cap.

use crate::config::DebateParams;
use crate::ports::agent_gateway::{AgentGateway, GatewayError};
use crate::ports::progress::{DebatePhase, DebateProgress, NoProgress};
use crate::ports::report_renderer::{PlainReportRenderer, ReportRenderer};
use crate::use_cases::shared::{DebateState, SharedState, dispatch_follow_up};
use council_domain::{
    Command, DebateOutcome, DebateStatus, DomainError, FinalVerdict, FinishPayload,
    PromptTemplate, Query, ReportPayload, parse_moderator_reply,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Errors that can occur while running a deliberation
#[derive(Error, Debug)]
pub enum RunDebateError {
    #[error("query is empty and the transcript has no history")]
    NothingToDiscuss,

    #[error("a deliberation is already in progress")]
    Busy,

    /// Moderator transport failure is fatal, unlike expert failure
    #[error("moderator call failed: {0}")]
    ModeratorFailed(#[from] GatewayError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Input for the RunDebate use case
#[derive(Debug, Clone)]
pub struct RunDebateInput {
    /// Opening query; absent when the transcript already carries history
    pub query: Option<Query>,
}

impl RunDebateInput {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Query::try_new(query),
        }
    }
}

/// Use case for running one bounded deliberation
pub struct RunDebateUseCase<G: AgentGateway + 'static> {
    gateway: Arc<G>,
    state: SharedState,
    params: DebateParams,
    renderer: Arc<dyn ReportRenderer>,
}

impl<G: AgentGateway + 'static> RunDebateUseCase<G> {
    pub fn new(gateway: Arc<G>, state: SharedState, params: DebateParams) -> Self {
        Self {
            gateway,
            state,
            params,
            renderer: Arc::new(PlainReportRenderer),
        }
    }

    /// Replace the verdict renderer (the console card, usually)
    pub fn with_renderer(mut self, renderer: Arc<dyn ReportRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunDebateInput) -> Result<DebateOutcome, RunDebateError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunDebateInput,
        progress: &dyn DebateProgress,
    ) -> Result<DebateOutcome, RunDebateError> {
        // Fail fast instead of queueing behind another operation; nothing
        // has been mutated at this point.
        let mut state = self.state.try_lock().map_err(|_| RunDebateError::Busy)?;

        if input.query.is_none() && state.transcript.is_empty() {
            return Err(RunDebateError::NothingToDiscuss);
        }
        let query = input.query.as_ref().map(Query::content).unwrap_or_default();
        state.session.begin(query).map_err(|_| RunDebateError::Busy)?;

        info!(
            "starting deliberation with {} experts, max {} rounds",
            state.registry.expert_keys().count(),
            state.session.max_rounds()
        );

        if let Some(query) = &input.query {
            state.append_user(query.content());
            state.notify_last(progress);
        }

        self.fan_out(&mut state, progress).await;
        state.session.advance(DebateStatus::AwaitingModerator)?;

        self.moderator_loop(&mut state, progress).await
    }

    /// Broadcast the opening query to every expert concurrently.
    ///
    /// A barrier join: the phase completes once every call has settled. A
    /// failed or empty answer is an abstention: no transcript entry, no
    /// abort.
    async fn fan_out(&self, state: &mut DebateState, progress: &dyn DebateProgress) {
        let experts: Vec<String> = state.registry.expert_keys().map(str::to_string).collect();
        progress.on_phase_start(DebatePhase::FanOut, experts.len());

        let prompt = state.augmented(PromptTemplate::opening_query(state.session.query()));

        let mut join_set = JoinSet::new();
        for key in experts {
            let gateway = Arc::clone(&self.gateway);
            let prompt = prompt.clone();
            let session = state.registry.session(&key).cloned();

            join_set.spawn(async move {
                let result = gateway.complete(&key, &prompt, session.as_ref(), false).await;
                (key, result)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((key, Ok(reply))) if !reply.is_empty() => {
                    debug!("expert {} answered", key);
                    progress.on_expert_settled(&key, true);
                    state.record_reply(&key, reply);
                    state.notify_last(progress);
                }
                Ok((key, Ok(reply))) => {
                    warn!("expert {} returned an empty answer, abstaining", key);
                    progress.on_expert_settled(&key, false);
                    state.absorb_session(&key, reply.new_session);
                }
                Ok((key, Err(e))) => {
                    warn!("expert {} failed, abstaining: {}", key, e);
                    progress.on_expert_settled(&key, false);
                }
                Err(e) => {
                    warn!("fan-out task join error: {}", e);
                }
            }
        }

        progress.on_phase_complete(DebatePhase::FanOut);
    }

    /// The bounded moderator loop.
    ///
    /// The round condition is checked at round-start, so exactly
    /// `max_rounds` rounds execute when no `FINISH` arrives; a cap exit
    /// forces no terminal payload, the last reply stands as-is.
    async fn moderator_loop(
        &self,
        state: &mut DebateState,
        progress: &dyn DebateProgress,
    ) -> Result<DebateOutcome, RunDebateError> {
        let moderator = state.registry.moderator_key().to_string();
        let mut verdict = None;

        while state.session.can_start_round() {
            let round = state.session.begin_round();
            progress.on_round_start(round, state.session.max_rounds());
            debug!("moderator round {} begins", round);

            let expert_keys: Vec<&str> = state.registry.expert_keys().collect();
            let prompt = state.augmented(PromptTemplate::moderator_round(
                &state.transcript.render(),
                &expert_keys,
            ));

            let session = state.registry.session(&moderator).cloned();
            let reply = match self
                .gateway
                .complete(&moderator, &prompt, session.as_ref(), true)
                .await
            {
                Ok(reply) => reply,
                Err(e) => {
                    // Moderator failure is fatal: end the session before
                    // surfacing the error.
                    warn!("moderator call failed in round {}: {}", round, e);
                    state.session.advance(DebateStatus::Aborted)?;
                    return Err(RunDebateError::ModeratorFailed(e));
                }
            };
            state.absorb_session(&moderator, reply.new_session.clone());

            match parse_moderator_reply(&reply.text) {
                Command::Finish { payload } => {
                    let (content, closing) = match payload {
                        FinishPayload::Report(map) => {
                            let report = ReportPayload::classify(&map);
                            let rendered = self.renderer.render(&report);
                            (rendered, FinalVerdict::Report(report))
                        }
                        FinishPayload::Text(text) => (text.clone(), FinalVerdict::Text(text)),
                    };
                    state.append_host(content);
                    state.notify_last(progress);
                    state.session.advance(DebateStatus::Finished)?;
                    verdict = Some(closing);
                    break;
                }
                Command::Ask { target, content } => {
                    match state.registry.resolve(&target).map(str::to_string) {
                        Some(key) => {
                            progress.on_follow_up(&key, &content);
                            state.session.advance(DebateStatus::Dispatching)?;

                            let name = state
                                .registry
                                .display_name(&key)
                                .unwrap_or(key.as_str())
                                .to_string();
                            dispatch_follow_up(
                                self.gateway.as_ref(),
                                state,
                                progress,
                                &key,
                                PromptTemplate::follow_up_marker(&name, &content),
                                PromptTemplate::follow_up(&content),
                            )
                            .await;

                            state.session.advance(DebateStatus::AwaitingModerator)?;
                        }
                        None => {
                            // Unresolvable target: degrade gracefully, the
                            // raw reply stands as the final word.
                            warn!("moderator named unknown target {:?}", target);
                            state.append_host(reply.text.clone());
                            state.notify_last(progress);
                            state.session.advance(DebateStatus::Finished)?;
                            verdict = Some(FinalVerdict::Text(reply.text));
                            break;
                        }
                    }
                }
                Command::Malformed { raw } => {
                    debug!("moderator reply matched no command form");
                    state.append_host(raw.clone());
                    state.notify_last(progress);
                    state.session.advance(DebateStatus::Finished)?;
                    verdict = Some(FinalVerdict::Text(raw));
                    break;
                }
            }

            // Rate-limiting courtesy before the next moderator call.
            if state.session.can_start_round() && !self.params.round_delay.is_zero() {
                tokio::time::sleep(self.params.round_delay).await;
            }
        }

        if !state.session.status().is_terminal() {
            // Round cap exhausted without an explicit FINISH.
            state.session.advance(DebateStatus::Finished)?;
        }

        info!(
            "deliberation ended: {} after {} rounds",
            state.session.status(),
            state.session.round()
        );

        Ok(DebateOutcome {
            rounds: state.session.round(),
            status: state.session.status(),
            verdict,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{ScriptedGateway, ask, finish_object, finish_text, test_state};
    use council_domain::DebateStatus;
    use std::time::Duration;

    fn params() -> DebateParams {
        DebateParams::new(5, Duration::ZERO)
    }

    fn capped(max_rounds: u32) -> DebateParams {
        DebateParams::new(max_rounds, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_fan_out_partial_failure_reaches_moderator() {
        let gateway = ScriptedGateway::new()
            .with_reply("general", "granite host rock")
            .with_failure("geophysical")
            .with_reply("host", &finish_text("converged"));
        let state = test_state(5);
        let use_case = RunDebateUseCase::new(gateway.clone(), state.clone(), params());

        let outcome = use_case
            .execute(RunDebateInput::new("assess the target"))
            .await
            .unwrap();

        assert_eq!(outcome.status, DebateStatus::Finished);

        let state = state.try_lock().unwrap();
        let keys: Vec<_> = state
            .transcript
            .entries()
            .iter()
            .filter_map(|e| e.participant_key.clone())
            .collect();
        assert!(keys.contains(&"general".to_string()));
        assert!(!keys.contains(&"geophysical".to_string()));
    }

    #[tokio::test]
    async fn test_round_cap_is_exact() {
        // Moderator always asks the same resolvable target: with a cap of 2
        // exactly 2 moderator calls happen, never a 3rd.
        let gateway = ScriptedGateway::new()
            .with_reply("general", "opening answer")
            .with_reply("geophysical", "gravity low under the fault")
            .with_repeating("host", &ask("geophysical", "how deep?"));
        let state = test_state(2);
        let use_case = RunDebateUseCase::new(gateway.clone(), state.clone(), capped(2));

        let outcome = use_case
            .execute(RunDebateInput::new("where next?"))
            .await
            .unwrap();

        assert_eq!(outcome.rounds, 2);
        assert_eq!(outcome.status, DebateStatus::Finished);
        assert!(outcome.verdict.is_none());
        assert_eq!(gateway.call_count("host"), 2);
    }

    #[tokio::test]
    async fn test_moderator_failure_aborts() {
        let gateway = ScriptedGateway::new()
            .with_reply("general", "answer")
            .with_reply("geophysical", "answer")
            .with_failure("host");
        let state = test_state(5);
        let use_case = RunDebateUseCase::new(gateway, state.clone(), params());

        let err = use_case
            .execute(RunDebateInput::new("query"))
            .await
            .unwrap_err();
        assert!(matches!(err, RunDebateError::ModeratorFailed(_)));

        let state = state.try_lock().unwrap();
        assert_eq!(state.session.status(), DebateStatus::Aborted);
    }

    #[tokio::test]
    async fn test_empty_query_empty_transcript_rejected() {
        let gateway = ScriptedGateway::new();
        let state = test_state(5);
        let use_case = RunDebateUseCase::new(gateway.clone(), state.clone(), params());

        let err = use_case.execute(RunDebateInput::new("  ")).await.unwrap_err();
        assert!(matches!(err, RunDebateError::NothingToDiscuss));

        // no calls issued, no state mutated
        assert_eq!(gateway.total_calls(), 0);
        let state = state.try_lock().unwrap();
        assert!(state.transcript.is_empty());
        assert_eq!(state.session.status(), DebateStatus::Idle);
    }

    #[tokio::test]
    async fn test_busy_rejection_has_no_side_effects() {
        let gateway = ScriptedGateway::new();
        let state = test_state(5);
        let use_case = RunDebateUseCase::new(gateway.clone(), state.clone(), params());

        let guard = state.lock().await;
        let err = use_case.execute(RunDebateInput::new("query")).await.unwrap_err();
        assert!(matches!(err, RunDebateError::Busy));
        assert_eq!(gateway.total_calls(), 0);
        drop(guard);
    }

    #[tokio::test]
    async fn test_prediction_finish_yields_prediction_verdict() {
        let gateway = ScriptedGateway::new()
            .with_reply("general", "answer")
            .with_reply("geophysical", "answer")
            .with_reply(
                "host",
                &finish_object(r#"{"成矿概率":"高","有利部位":"NE flank"}"#),
            );
        let state = test_state(5);
        let use_case = RunDebateUseCase::new(gateway, state, params());

        let outcome = use_case.execute(RunDebateInput::new("predict")).await.unwrap();
        match outcome.verdict {
            Some(FinalVerdict::Report(report)) => assert!(report.is_prediction()),
            other => panic!("expected prediction report, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_general_finish_yields_general_verdict() {
        let gateway = ScriptedGateway::new()
            .with_reply("general", "answer")
            .with_reply("geophysical", "answer")
            .with_reply(
                "host",
                &finish_object(r#"{"研讨总结":"porphyry system","关键知识点":"zoning"}"#),
            );
        let state = test_state(5);
        let use_case = RunDebateUseCase::new(gateway, state, params());

        let outcome = use_case.execute(RunDebateInput::new("explain")).await.unwrap();
        match outcome.verdict {
            Some(FinalVerdict::Report(report)) => assert!(!report.is_prediction()),
            other => panic!("expected general report, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_reply_finishes_with_raw_text() {
        let gateway = ScriptedGateway::new()
            .with_reply("general", "answer")
            .with_reply("geophysical", "answer")
            .with_reply("host", "I think we are done here, good work everyone.");
        let state = test_state(5);
        let use_case = RunDebateUseCase::new(gateway, state.clone(), params());

        let outcome = use_case.execute(RunDebateInput::new("query")).await.unwrap();
        assert_eq!(outcome.status, DebateStatus::Finished);
        match outcome.verdict {
            Some(FinalVerdict::Text(text)) => {
                assert!(text.contains("good work everyone"));
            }
            other => panic!("expected text verdict, got {other:?}"),
        }

        let state = state.try_lock().unwrap();
        let last = state.transcript.last().unwrap();
        assert_eq!(last.participant_key.as_deref(), Some("host"));
    }

    #[tokio::test]
    async fn test_unresolved_target_finishes_with_raw_reply() {
        let raw = ask("seismic", "what about reflection data?");
        let gateway = ScriptedGateway::new()
            .with_reply("general", "answer")
            .with_reply("geophysical", "answer")
            .with_reply("host", &raw);
        let state = test_state(5);
        let use_case = RunDebateUseCase::new(gateway.clone(), state.clone(), params());

        let outcome = use_case.execute(RunDebateInput::new("query")).await.unwrap();
        assert_eq!(outcome.status, DebateStatus::Finished);
        assert_eq!(outcome.rounds, 1);
        // no dispatch happened
        assert_eq!(gateway.call_count("general"), 1);
        assert_eq!(gateway.call_count("geophysical"), 1);
    }

    #[tokio::test]
    async fn test_ask_dispatches_then_finish() {
        let gateway = ScriptedGateway::new()
            .with_reply("general", "alteration halo present")
            .with_script(
                "geophysical",
                vec!["resistivity low", "about 600m deep"],
            )
            .with_script(
                "host",
                vec![ask("GEOPHYSICAL", "how deep?"), finish_text("done")],
            );
        let state = test_state(5);
        let use_case = RunDebateUseCase::new(gateway.clone(), state.clone(), params());

        let outcome = use_case.execute(RunDebateInput::new("query")).await.unwrap();
        assert_eq!(outcome.rounds, 2);
        assert_eq!(outcome.status, DebateStatus::Finished);
        // uppercase target resolved case-insensitively and dispatched
        assert_eq!(gateway.call_count("geophysical"), 2);

        let state = state.try_lock().unwrap();
        let contents: Vec<_> = state
            .transcript
            .entries()
            .iter()
            .map(|e| e.content.as_str())
            .collect();
        assert!(contents.contains(&"about 600m deep"));
    }

    #[tokio::test]
    async fn test_dispatch_failure_does_not_abort_loop() {
        let gateway = ScriptedGateway::new()
            .with_reply("general", "answer")
            .with_script_results(
                "geophysical",
                vec![
                    Ok("initial answer".to_string()),
                    Err(GatewayError::Timeout),
                ],
            )
            .with_script(
                "host",
                vec![ask("geophysical", "follow up?"), finish_text("done anyway")],
            );
        let state = test_state(5);
        let use_case = RunDebateUseCase::new(gateway, state.clone(), params());

        let outcome = use_case.execute(RunDebateInput::new("query")).await.unwrap();
        // the failed follow-up is swallowed; the loop ran its second round
        assert_eq!(outcome.rounds, 2);
        assert_eq!(outcome.status, DebateStatus::Finished);
    }

    #[tokio::test]
    async fn test_rounds_never_exceed_cap() {
        for max in [1, 2, 4] {
            let gateway = ScriptedGateway::new()
                .with_reply("general", "a")
                .with_reply("geophysical", "b")
                .with_repeating("host", &ask("general", "more?"));
            let state = test_state(max);
            let use_case = RunDebateUseCase::new(gateway, state, capped(max));

            let outcome = use_case.execute(RunDebateInput::new("q")).await.unwrap();
            assert!(outcome.rounds <= max);
            assert_eq!(outcome.rounds, max);
        }
    }
}

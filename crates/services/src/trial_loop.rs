use cogtest_core::trial::{BatteryKind, TrialSession, TrialStep, TrialSummary};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep};

use crate::api::{ApiClient, ApiRequest, paths};
use crate::config::RunLoopConfig;
use crate::outcome::RunOutcome;

/// User actions on a trial battery page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrialIntent {
    Respond(String),
    /// End the battery early.
    Finish,
}

pub trait TrialView {
    fn render(&mut self, session: &TrialSession);

    /// Backend verdict on the last response, if the battery reports one.
    fn feedback(&mut self, correct: Option<bool>);

    fn complete(&mut self, summary: &TrialSummary);
}

struct Endpoints {
    start: &'static str,
    answer: &'static str,
    finish: &'static str,
}

fn endpoints(kind: BatteryKind) -> Endpoints {
    match kind {
        BatteryKind::Stroop => Endpoints {
            start: paths::STROOP_START,
            answer: paths::STROOP_ANSWER,
            finish: paths::STROOP_FINISH,
        },
        BatteryKind::Mixed => Endpoints {
            start: paths::MIXED_START,
            answer: paths::MIXED_ANSWER,
            finish: paths::MIXED_FINISH,
        },
    }
}

/// Drives one Stroop or mixed battery from start to finish.
#[derive(Clone)]
pub struct TrialRunLoop {
    api: ApiClient,
    config: RunLoopConfig,
    kind: BatteryKind,
}

impl TrialRunLoop {
    #[must_use]
    pub fn new(api: ApiClient, config: RunLoopConfig, kind: BatteryKind) -> Self {
        Self { api, config, kind }
    }

    #[must_use]
    pub fn kind(&self) -> BatteryKind {
        self.kind
    }

    pub async fn run(
        &self,
        view: &mut dyn TrialView,
        mut intents: mpsc::Receiver<TrialIntent>,
    ) -> RunOutcome<TrialSummary> {
        let endpoints = endpoints(self.kind);
        let Some(start) = self
            .api
            .fetch_json::<Value>(ApiRequest::post(endpoints.start))
            .await
        else {
            return RunOutcome::Aborted;
        };
        let mut session =
            match TrialSession::from_start(self.kind, &start, self.config.mixed_default_total) {
                Ok(session) => session,
                Err(err) => {
                    tracing::debug!(kind = ?self.kind, error = %err, "trial session not started");
                    return RunOutcome::Aborted;
                }
            };
        tracing::debug!(kind = ?self.kind, session_id = %session.session_id(), "trial session started");

        view.render(&session);
        let mut shown_at = Instant::now();

        loop {
            let Some(intent) = intents.recv().await else {
                return RunOutcome::Abandoned;
            };
            let finish = match intent {
                TrialIntent::Finish => {
                    if !session.request_finish() {
                        continue;
                    }
                    true
                }
                TrialIntent::Respond(answer) => {
                    let Some(body) = session.respond(&answer, shown_at.elapsed()) else {
                        continue;
                    };
                    let Some(reply) = self
                        .api
                        .fetch_json::<Value>(ApiRequest::post(endpoints.answer).with_body(body))
                        .await
                    else {
                        // The stimulus stays up; the next click posts again.
                        session.retract();
                        continue;
                    };

                    let step = session.apply_feedback(&reply);
                    if step == TrialStep::Stalled {
                        tracing::debug!(kind = ?self.kind, "answer reply carried no next stimulus");
                        session.retract();
                        continue;
                    }
                    view.feedback(session.last_correct());
                    match step {
                        TrialStep::Finish => true,
                        _ if self.kind == BatteryKind::Stroop => {
                            match self.hold_feedback(&mut session, &mut intents).await {
                                Hold::Elapsed => false,
                                Hold::Finish => true,
                                Hold::Closed => return RunOutcome::Abandoned,
                            }
                        }
                        _ => false,
                    }
                }
            };

            if finish {
                if let Some(summary) = self.finalize(&mut session, view, endpoints.finish).await {
                    return RunOutcome::Finished(summary);
                }
                session.reopen();
            } else {
                session.show_next();
            }
            view.render(&session);
            shown_at = Instant::now();
        }
    }

    // Keeps the verdict on screen for the feedback delay; only an early
    // finish is honoured meanwhile.
    async fn hold_feedback(
        &self,
        session: &mut TrialSession,
        intents: &mut mpsc::Receiver<TrialIntent>,
    ) -> Hold {
        let delay = sleep(self.config.feedback_delay);
        tokio::pin!(delay);
        loop {
            tokio::select! {
                () = &mut delay => return Hold::Elapsed,
                intent = intents.recv() => match intent {
                    None => return Hold::Closed,
                    Some(TrialIntent::Finish) if session.request_finish() => return Hold::Finish,
                    Some(_) => {}
                },
            }
        }
    }

    async fn finalize(
        &self,
        session: &mut TrialSession,
        view: &mut dyn TrialView,
        path: &'static str,
    ) -> Option<TrialSummary> {
        let reply = self
            .api
            .fetch_json::<Value>(ApiRequest::post(path).with_body(session.finish_body()))
            .await?;
        let Some(summary) = session.decode_summary(&reply) else {
            tracing::info!(url = path, "fetch_error");
            return None;
        };
        session.finish(summary.clone());
        tracing::debug!(kind = ?self.kind, answered = session.answered(), "trial session finished");
        view.complete(&summary);
        Some(summary)
    }
}

enum Hold {
    Elapsed,
    Finish,
    Closed,
}

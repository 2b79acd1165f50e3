//! Async driver of the IQ block session.
//!
//! The loop owns an [`IqSession`] and feeds it three kinds of events: user
//! intents from a channel, one-second ticks, and backend replies. Each
//! display round restarts the ticker and the elapsed-time reference.

use std::time::Duration;

use cogtest_core::layout::block_size_for_width;
use cogtest_core::model::{ItemId, TestResult};
use cogtest_core::session::{BlockResponse, IqSession, Resolution, StartResponse, Step};
use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

use crate::api::{ApiClient, ApiRequest, paths};
use crate::config::RunLoopConfig;
use crate::outcome::RunOutcome;
use crate::result_cache::ResultCache;

const TICK: Duration = Duration::from_secs(1);

/// User actions on the IQ page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IqIntent {
    /// Commit an option for an item.
    Answer { item_id: ItemId, value: String },
    /// Move the pending selection without committing.
    Change { item_id: ItemId, value: String },
    /// The manual "next" control.
    Advance,
}

/// Receives session snapshots from the loop.
pub trait IqView {
    fn render(&mut self, session: &IqSession);

    /// The session finished; `result` is whatever the finish call returned.
    fn complete(&mut self, result: Option<&TestResult>);
}

/// Drives one IQ session from start to finish.
#[derive(Clone)]
pub struct IqRunLoop {
    api: ApiClient,
    cache: ResultCache,
    config: RunLoopConfig,
}

impl IqRunLoop {
    #[must_use]
    pub fn new(api: ApiClient, cache: ResultCache, config: RunLoopConfig) -> Self {
        Self { api, cache, config }
    }

    /// Run the session until it finishes, stalls or the page goes away.
    pub async fn run(
        &self,
        view: &mut dyn IqView,
        mut intents: mpsc::Receiver<IqIntent>,
    ) -> RunOutcome<Option<TestResult>> {
        let block_size = block_size_for_width(self.config.viewport.width);
        let Some(start) = self
            .api
            .fetch_json::<StartResponse>(ApiRequest::post(paths::iq_start(block_size)))
            .await
        else {
            return RunOutcome::Aborted;
        };
        let mut session = match IqSession::start(self.config.policy, start) {
            Ok(session) => session,
            Err(err) => {
                tracing::debug!(error = %err, "iq session not started");
                return RunOutcome::Aborted;
            }
        };
        tracing::debug!(
            session_id = %session.session_id(),
            total = session.total(),
            block_size,
            "iq session started"
        );
        self.cache.remember_session(session.session_id()).await;

        let mut round = DisplayRound::begin();
        view.render(&session);

        loop {
            let step = tokio::select! {
                intent = intents.recv() => {
                    let Some(intent) = intent else {
                        tracing::debug!(session_id = %session.session_id(), "iq intents closed");
                        return RunOutcome::Abandoned;
                    };
                    apply_intent(&mut session, intent, round.shown_at.elapsed())
                }
                _ = round.ticker.tick() => {
                    let (expired, step) = session.tick();
                    if !expired.is_empty() {
                        tracing::debug!(expired = ?expired, "iq items timed out");
                    }
                    Some(step.unwrap_or(Step::Wait))
                }
            };

            let Some(step) = step else {
                continue;
            };
            match step {
                Step::ShowItem(_) => {
                    round = DisplayRound::begin();
                    view.render(&session);
                }
                Step::Wait | Step::AwaitAdvance => view.render(&session),
                Step::Submit => {
                    view.render(&session);
                    match self.submit_block(&mut session).await {
                        Some(Step::ShowItem(_)) => {
                            round = DisplayRound::begin();
                            view.render(&session);
                        }
                        Some(Step::Finalize) => return self.finalize(&mut session, view).await,
                        _ => return RunOutcome::Stalled,
                    }
                }
                Step::Finalize => return self.finalize(&mut session, view).await,
                Step::Stalled => return RunOutcome::Stalled,
            }
        }
    }

    async fn submit_block(&self, session: &mut IqSession) -> Option<Step> {
        let submission = session.submission();
        tracing::debug!(
            session_id = %session.session_id(),
            answers = submission.answers.len(),
            "submitting iq block"
        );
        let body = serde_json::to_value(&submission).ok()?;
        let response = self
            .api
            .fetch_json::<BlockResponse>(ApiRequest::post(paths::IQ_ANSWER).with_body(body))
            .await?;
        Some(session.apply_block_response(response))
    }

    async fn finalize(
        &self,
        session: &mut IqSession,
        view: &mut dyn IqView,
    ) -> RunOutcome<Option<TestResult>> {
        let body = json!({ "session_id": session.session_id() });
        let result = self
            .api
            .fetch_json::<TestResult>(ApiRequest::post(paths::IQ_FINISH).with_body(body))
            .await;
        self.cache.save(result.as_ref()).await;
        session.finish();
        tracing::debug!(
            session_id = %session.session_id(),
            has_result = result.is_some(),
            "iq session finished"
        );
        view.complete(result.as_ref());
        RunOutcome::Finished(result)
    }
}

fn apply_intent(session: &mut IqSession, intent: IqIntent, elapsed: Duration) -> Option<Step> {
    match intent {
        IqIntent::Answer { item_id, value } => match session.commit(&item_id, &value, elapsed) {
            Resolution::Recorded(step) => Some(step),
            other => {
                tracing::debug!(item_id = %item_id, resolution = ?other, "iq answer ignored");
                None
            }
        },
        IqIntent::Change { item_id, value } => session
            .change_selection(&item_id, &value)
            .then_some(Step::Wait),
        IqIntent::Advance => match session.advance() {
            Step::Submit => Some(Step::Submit),
            _ => None,
        },
    }
}

/// Ticker and elapsed-time reference of the items currently on screen.
struct DisplayRound {
    shown_at: Instant,
    ticker: Interval,
}

impl DisplayRound {
    fn begin() -> Self {
        let shown_at = Instant::now();
        let mut ticker = interval_at(shown_at + TICK, TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { shown_at, ticker }
    }
}

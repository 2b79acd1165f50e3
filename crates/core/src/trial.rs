//! Generic state machine for the trial-based batteries (Stroop task switching
//! and the mixed IQ + Stroop battery). Both share one shape: start, show a
//! stimulus, submit a single response, then either show the next stimulus or
//! finish. The battery kind selects payload decoding and request bodies.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::SessionError;
use crate::model::{MixedItem, MixedScore, SessionId, StroopScore, StroopTrial};
use crate::timer::reaction_ms;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryKind {
    Stroop,
    Mixed,
}

/// The stimulus currently on screen.
#[derive(Clone, Debug, PartialEq)]
pub enum TrialStimulus {
    Stroop(StroopTrial),
    Mixed(MixedItem),
}

/// Final score returned by the battery's finish call.
#[derive(Clone, Debug, PartialEq)]
pub enum TrialSummary {
    Stroop(StroopScore),
    Mixed(MixedScore),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrialPhase {
    Responding,
    Submitting,
    /// Feedback for the last response is shown; the next stimulus is queued.
    Feedback,
    Finalizing,
    Finished,
}

/// What the driver should do after the backend answered a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrialStep {
    Next,
    Finish,
    Stalled,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrialSession {
    kind: BatteryKind,
    session_id: SessionId,
    current: TrialStimulus,
    queued: Option<TrialStimulus>,
    trial_index: u32,
    answered: u32,
    total: Option<u32>,
    last_correct: Option<bool>,
    phase: TrialPhase,
    summary: Option<TrialSummary>,
}

fn decode<T: for<'de> Deserialize<'de>>(value: Option<&Value>) -> Option<T> {
    value
        .filter(|raw| !raw.is_null())
        .and_then(|raw| serde_json::from_value(raw.clone()).ok())
}

impl TrialSession {
    /// Build a session from a start response.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::MissingField` when the session id is absent and
    /// `SessionError::Empty` when no first stimulus was delivered.
    pub fn from_start(
        kind: BatteryKind,
        start: &Value,
        default_total: u32,
    ) -> Result<Self, SessionError> {
        let session_id: SessionId = decode(start.get("session_id"))
            .ok_or(SessionError::MissingField { field: "session_id" })?;
        let (current, total) = match kind {
            BatteryKind::Stroop => (
                decode::<StroopTrial>(start.get("trial")).map(TrialStimulus::Stroop),
                None,
            ),
            BatteryKind::Mixed => (
                decode::<MixedItem>(start.get("item")).map(TrialStimulus::Mixed),
                Some(decode::<u32>(start.get("total")).unwrap_or(default_total)),
            ),
        };
        let current = current.ok_or(SessionError::Empty)?;

        Ok(Self {
            kind,
            session_id,
            current,
            queued: None,
            trial_index: 1,
            answered: 0,
            total,
            last_correct: None,
            phase: TrialPhase::Responding,
            summary: None,
        })
    }

    #[must_use]
    pub fn kind(&self) -> BatteryKind {
        self.kind
    }

    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    #[must_use]
    pub fn current(&self) -> &TrialStimulus {
        &self.current
    }

    /// One-based index of the stimulus on screen.
    #[must_use]
    pub fn trial_index(&self) -> u32 {
        self.trial_index
    }

    #[must_use]
    pub fn answered(&self) -> u32 {
        self.answered
    }

    #[must_use]
    pub fn total(&self) -> Option<u32> {
        self.total
    }

    /// Whether the backend judged the last response correct (Stroop only).
    #[must_use]
    pub fn last_correct(&self) -> Option<bool> {
        self.last_correct
    }

    #[must_use]
    pub fn phase(&self) -> TrialPhase {
        self.phase
    }

    #[must_use]
    pub fn summary(&self) -> Option<&TrialSummary> {
        self.summary.as_ref()
    }

    /// Capture a response and build the answer request body.
    ///
    /// Returns `None` if the session is not waiting for a response.
    pub fn respond(&mut self, answer: &str, elapsed: Duration) -> Option<Value> {
        if self.phase != TrialPhase::Responding {
            return None;
        }
        self.phase = TrialPhase::Submitting;
        self.answered = self.answered.saturating_add(1);
        let body = match self.kind {
            BatteryKind::Stroop => json!({
                "session_id": self.session_id,
                "answer": answer,
                "rt_ms": reaction_ms(elapsed),
            }),
            BatteryKind::Mixed => json!({
                "session_id": self.session_id,
                "answer": answer,
            }),
        };
        Some(body)
    }

    /// Apply the backend's reply to a single response.
    pub fn apply_feedback(&mut self, reply: &Value) -> TrialStep {
        if self.phase != TrialPhase::Submitting {
            return TrialStep::Stalled;
        }
        self.last_correct = reply.get("correct").and_then(Value::as_bool);
        if reply.get("finished").and_then(Value::as_bool).unwrap_or(false) {
            self.phase = TrialPhase::Finalizing;
            return TrialStep::Finish;
        }

        let next = match self.kind {
            BatteryKind::Stroop => {
                decode::<StroopTrial>(reply.get("next_trial")).map(TrialStimulus::Stroop)
            }
            BatteryKind::Mixed => decode::<MixedItem>(reply.get("item")).map(TrialStimulus::Mixed),
        };
        match next {
            Some(next) => {
                self.queued = Some(next);
                self.phase = TrialPhase::Feedback;
                TrialStep::Next
            }
            None => TrialStep::Stalled,
        }
    }

    /// Put the queued stimulus on screen. Returns `false` if none is queued.
    pub fn show_next(&mut self) -> bool {
        let Some(next) = self.queued.take() else {
            return false;
        };
        self.current = next;
        self.trial_index = self.trial_index.saturating_add(1);
        self.phase = TrialPhase::Responding;
        true
    }

    /// Undo a response whose answer call never came back, so the same
    /// stimulus takes another response. Returns `false` outside `Submitting`.
    pub fn retract(&mut self) -> bool {
        if self.phase != TrialPhase::Submitting {
            return false;
        }
        self.answered = self.answered.saturating_sub(1);
        self.phase = TrialPhase::Responding;
        true
    }

    /// Manual early finish. Returns `false` once finalization already began.
    pub fn request_finish(&mut self) -> bool {
        if matches!(self.phase, TrialPhase::Finalizing | TrialPhase::Finished) {
            return false;
        }
        self.phase = TrialPhase::Finalizing;
        true
    }

    /// Leave `Finalizing` after a finish call failed. A stimulus queued before
    /// the finish goes on screen; otherwise the current one takes responses
    /// again. Returns `false` outside `Finalizing`.
    pub fn reopen(&mut self) -> bool {
        if self.phase != TrialPhase::Finalizing {
            return false;
        }
        if !self.show_next() {
            self.phase = TrialPhase::Responding;
        }
        true
    }

    #[must_use]
    pub fn finish_body(&self) -> Value {
        json!({ "session_id": self.session_id })
    }

    /// Decode the finish payload for this battery.
    #[must_use]
    pub fn decode_summary(&self, reply: &Value) -> Option<TrialSummary> {
        match self.kind {
            BatteryKind::Stroop => {
                serde_json::from_value::<StroopScore>(reply.clone())
                    .ok()
                    .map(TrialSummary::Stroop)
            }
            BatteryKind::Mixed => serde_json::from_value::<MixedScore>(reply.clone())
                .ok()
                .map(TrialSummary::Mixed),
        }
    }

    pub fn finish(&mut self, summary: TrialSummary) {
        self.summary = Some(summary);
        self.phase = TrialPhase::Finished;
    }
}

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::model::{Answer, Item, ItemId, SessionId};
use crate::timer::{Countdown, Tick, answer_seconds};

//
// ─── WIRE SHAPES ───────────────────────────────────────────────────────────────
//

/// `config` object of the session-start response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct StartConfig {
    #[serde(default)]
    pub n_items: u32,
}

/// Response of `POST /api/iq/start`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StartResponse {
    pub session_id: SessionId,
    #[serde(default)]
    pub config: StartConfig,
    #[serde(default)]
    pub block: Vec<Item>,
}

/// Response of `POST /api/iq/answer`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BlockResponse {
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub block: Option<Vec<Item>>,
}

/// Body of `POST /api/iq/answer`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockSubmission {
    pub session_id: SessionId,
    pub answers: Vec<Answer>,
}

//
// ─── POLICY & PHASES ───────────────────────────────────────────────────────────
//

/// How the loop moves through a block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvancePolicy {
    /// One item at a time; the next item shows as soon as one resolves.
    #[default]
    Immediate,
    /// The whole block at once; a manual "next" is enabled once every item
    /// has resolved.
    ManualGate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    ShowingItem,
    AwaitingAdvance,
    SubmittingBlock,
    Finalizing,
    Finished,
}

/// What the driver should do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// A new item (block index) is on screen; restart the display timer.
    ShowItem(usize),
    /// Nothing to do until more input or ticks arrive.
    Wait,
    /// Every item of the block is resolved; the manual "next" is enabled.
    AwaitAdvance,
    /// Send [`IqSession::submission`] to the backend.
    Submit,
    /// The backend reported completion; call finish.
    Finalize,
    /// The backend answered without a next block and without completion.
    Stalled,
}

/// Outcome of a user answer or an expiry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Recorded(Step),
    AlreadyResolved,
    NotDisplayed,
    UnknownOption,
}

//
// ─── ITEM SLOT ─────────────────────────────────────────────────────────────────
//

/// An item of the current block together with its local response state.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemSlot {
    item: Item,
    countdown: Option<Countdown>,
    pending: Option<String>,
    changes: u32,
    answer: Option<Answer>,
}

impl ItemSlot {
    fn new(item: Item) -> Self {
        Self {
            item,
            countdown: None,
            pending: None,
            changes: 0,
            answer: None,
        }
    }

    fn show(&mut self) {
        self.countdown = Some(Countdown::start(self.item.time_limit()));
    }

    #[must_use]
    pub fn item(&self) -> &Item {
        &self.item
    }

    /// Seconds left on this item's countdown (full limit before display).
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.countdown
            .map_or(self.item.time_limit(), |countdown| countdown.remaining())
    }

    #[must_use]
    pub fn timer_running(&self) -> bool {
        self.countdown.is_some_and(|countdown| countdown.is_running())
    }

    #[must_use]
    pub fn answer(&self) -> Option<&Answer> {
        self.answer.as_ref()
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.answer.is_some()
    }

    #[must_use]
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    #[must_use]
    pub fn changes(&self) -> u32 {
        self.changes
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Client-side state of one IQ session run.
///
/// All transitions are plain methods so the loop can be exercised without a
/// UI or a network. For each item exactly one of [`IqSession::commit`] and
/// [`IqSession::expire`] records an answer; whichever comes second is a no-op.
#[derive(Clone, Debug, PartialEq)]
pub struct IqSession {
    session_id: SessionId,
    policy: AdvancePolicy,
    total: u32,
    answered: u32,
    block_offset: u32,
    slots: Vec<ItemSlot>,
    cursor: usize,
    phase: SessionPhase,
}

impl IqSession {
    /// Build a session from the start response and display its first item(s).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the initial block has no items.
    pub fn start(policy: AdvancePolicy, response: StartResponse) -> Result<Self, SessionError> {
        if response.block.is_empty() {
            return Err(SessionError::Empty);
        }
        let block_len = u32::try_from(response.block.len()).unwrap_or(u32::MAX);
        let total = if response.config.n_items == 0 {
            block_len
        } else {
            response.config.n_items
        };

        let mut session = Self {
            session_id: response.session_id,
            policy,
            total,
            answered: 0,
            block_offset: 0,
            slots: Vec::new(),
            cursor: 0,
            phase: SessionPhase::ShowingItem,
        };
        session.load_block(response.block);
        Ok(session)
    }

    fn load_block(&mut self, block: Vec<Item>) {
        self.block_offset = self.answered;
        self.slots = block.into_iter().map(ItemSlot::new).collect();
        self.cursor = 0;
        self.phase = SessionPhase::ShowingItem;
        match self.policy {
            AdvancePolicy::Immediate => {
                if let Some(slot) = self.slots.first_mut() {
                    slot.show();
                }
            }
            AdvancePolicy::ManualGate => self.slots.iter_mut().for_each(ItemSlot::show),
        }
    }

    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    #[must_use]
    pub fn policy(&self) -> AdvancePolicy {
        self.policy
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Total number of items in the session, as configured by the backend.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Number of items answered or timed out so far.
    #[must_use]
    pub fn answered(&self) -> u32 {
        self.answered
    }

    #[must_use]
    pub fn block(&self) -> &[ItemSlot] {
        &self.slots
    }

    /// Items currently on screen.
    #[must_use]
    pub fn displayed(&self) -> &[ItemSlot] {
        if !matches!(
            self.phase,
            SessionPhase::ShowingItem | SessionPhase::AwaitingAdvance
        ) {
            return &[];
        }
        match self.policy {
            AdvancePolicy::Immediate => self
                .slots
                .get(self.cursor..=self.cursor)
                .unwrap_or_default(),
            AdvancePolicy::ManualGate => &self.slots,
        }
    }

    /// One-based question number of the first displayed item.
    #[must_use]
    pub fn first_displayed_number(&self) -> u32 {
        let cursor = match self.policy {
            AdvancePolicy::Immediate => u32::try_from(self.cursor).unwrap_or(u32::MAX),
            AdvancePolicy::ManualGate => 0,
        };
        self.block_offset.saturating_add(cursor).saturating_add(1)
    }

    /// True once every item of the block has resolved (manual gate only).
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.policy == AdvancePolicy::ManualGate
            && self.phase == SessionPhase::AwaitingAdvance
    }

    fn displayed_index(&self, item_id: &ItemId) -> Option<usize> {
        let index = self
            .slots
            .iter()
            .position(|slot| slot.item.item_id() == item_id)?;
        let visible = match self.policy {
            AdvancePolicy::Immediate => index == self.cursor,
            AdvancePolicy::ManualGate => true,
        };
        let showing = matches!(
            self.phase,
            SessionPhase::ShowingItem | SessionPhase::AwaitingAdvance
        );
        (visible && showing).then_some(index)
    }

    fn tracked_changes(&self, slot: &ItemSlot) -> Option<u32> {
        match self.policy {
            AdvancePolicy::Immediate => Some(slot.changes),
            AdvancePolicy::ManualGate => None,
        }
    }

    /// Move the pending (uncommitted) selection of the current item.
    ///
    /// Returns `false` under the manual gate, which does not allow changes, or
    /// when the item is not pending a response.
    pub fn change_selection(&mut self, item_id: &ItemId, value: &str) -> bool {
        if self.policy == AdvancePolicy::ManualGate {
            return false;
        }
        let Some(index) = self.displayed_index(item_id) else {
            return false;
        };
        let slot = &mut self.slots[index];
        if slot.is_resolved() || !slot.item.accepts(value) {
            return false;
        }
        match slot.pending.as_deref() {
            Some(current) if current == value => {}
            Some(_) => {
                slot.changes = slot.changes.saturating_add(1);
                slot.pending = Some(value.to_owned());
            }
            None => slot.pending = Some(value.to_owned()),
        }
        true
    }

    /// Record the user's selection for a displayed item.
    ///
    /// `elapsed` is measured from the moment the item was displayed.
    pub fn commit(&mut self, item_id: &ItemId, value: &str, elapsed: Duration) -> Resolution {
        let Some(index) = self.displayed_index(item_id) else {
            return Resolution::NotDisplayed;
        };
        if self.slots[index].is_resolved() {
            return Resolution::AlreadyResolved;
        }
        if !self.slots[index].item.accepts(value) {
            return Resolution::UnknownOption;
        }

        let changes = self.tracked_changes(&self.slots[index]);
        let slot = &mut self.slots[index];
        if let Some(countdown) = slot.countdown.as_mut() {
            countdown.cancel();
        }
        slot.pending = Some(value.to_owned());
        slot.answer = Some(Answer::selected(
            slot.item.item_id().clone(),
            value.to_owned(),
            answer_seconds(elapsed),
            changes,
        ));
        Resolution::Recorded(self.after_resolution())
    }

    /// Record a time-out for a displayed item.
    pub fn expire(&mut self, item_id: &ItemId) -> Resolution {
        let Some(index) = self.displayed_index(item_id) else {
            return Resolution::NotDisplayed;
        };
        if self.slots[index].is_resolved() {
            return Resolution::AlreadyResolved;
        }
        if let Some(countdown) = self.slots[index].countdown.as_mut() {
            countdown.cancel();
        }
        self.record_timeout(index);
        Resolution::Recorded(self.after_resolution())
    }

    fn record_timeout(&mut self, index: usize) {
        let changes = self.tracked_changes(&self.slots[index]);
        let slot = &mut self.slots[index];
        slot.answer = Some(Answer::timed_out(
            slot.item.item_id().clone(),
            slot.item.time_limit(),
            changes,
        ));
    }

    /// Advance every running countdown on screen by one second.
    ///
    /// Returns the ids that timed out on this tick and the resulting step, if
    /// any item resolved.
    pub fn tick(&mut self) -> (Vec<ItemId>, Option<Step>) {
        let indices: Vec<usize> = match self.policy {
            AdvancePolicy::Immediate => vec![self.cursor],
            AdvancePolicy::ManualGate => (0..self.slots.len()).collect(),
        };
        if !matches!(
            self.phase,
            SessionPhase::ShowingItem | SessionPhase::AwaitingAdvance
        ) {
            return (Vec::new(), None);
        }

        let mut expired = Vec::new();
        for index in indices {
            let Some(slot) = self.slots.get_mut(index) else {
                continue;
            };
            let Some(countdown) = slot.countdown.as_mut() else {
                continue;
            };
            if countdown.tick() == Tick::Expired && !slot.is_resolved() {
                expired.push(slot.item.item_id().clone());
                self.record_timeout(index);
            }
        }

        if expired.is_empty() {
            return (expired, None);
        }
        let mut step = Step::Wait;
        for _ in &expired {
            step = self.after_resolution();
        }
        (expired, Some(step))
    }

    // Called once per recorded answer.
    fn after_resolution(&mut self) -> Step {
        self.answered = self.answered.saturating_add(1);
        match self.policy {
            AdvancePolicy::Immediate => {
                if self.cursor + 1 < self.slots.len() {
                    self.cursor += 1;
                    self.slots[self.cursor].show();
                    Step::ShowItem(self.cursor)
                } else {
                    self.phase = SessionPhase::SubmittingBlock;
                    Step::Submit
                }
            }
            AdvancePolicy::ManualGate => {
                if self.slots.iter().all(ItemSlot::is_resolved) {
                    self.phase = SessionPhase::AwaitingAdvance;
                    Step::AwaitAdvance
                } else {
                    Step::Wait
                }
            }
        }
    }

    /// The manual "next" control. Only opens submission once every item of
    /// the block has resolved.
    pub fn advance(&mut self) -> Step {
        if self.can_advance() {
            self.phase = SessionPhase::SubmittingBlock;
            Step::Submit
        } else {
            Step::Wait
        }
    }

    /// The answers recorded for the current block, in block order.
    #[must_use]
    pub fn submission(&self) -> BlockSubmission {
        BlockSubmission {
            session_id: self.session_id.clone(),
            answers: self
                .slots
                .iter()
                .filter_map(|slot| slot.answer.clone())
                .collect(),
        }
    }

    /// Apply the backend's reply to a block submission.
    pub fn apply_block_response(&mut self, response: BlockResponse) -> Step {
        if self.phase != SessionPhase::SubmittingBlock {
            return Step::Wait;
        }
        if response.done {
            self.phase = SessionPhase::Finalizing;
            return Step::Finalize;
        }
        match response.block {
            Some(block) if !block.is_empty() => {
                self.load_block(block);
                Step::ShowItem(0)
            }
            _ => Step::Stalled,
        }
    }

    /// Mark the session finished after the finish call returned.
    pub fn finish(&mut self) {
        self.phase = SessionPhase::Finished;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn two_item_start() -> StartResponse {
        serde_json::from_value(json!({
            "session_id": "s1",
            "config": {"n_items": 4},
            "block": [
                {"item_id": "A", "prompt": "A?", "options": ["1", "2"], "time_limit": 10},
                {"item_id": "B", "prompt": "B?", "options": ["x", "y"], "time_limit": 10}
            ]
        }))
        .unwrap()
    }

    fn id(raw: &str) -> ItemId {
        ItemId::new(raw)
    }

    fn tick_n(session: &mut IqSession, n: u32) -> Option<Step> {
        let mut last = None;
        for _ in 0..n {
            let (_, step) = session.tick();
            if step.is_some() {
                last = step;
            }
        }
        last
    }

    #[test]
    fn empty_start_block_is_rejected() {
        let start: StartResponse =
            serde_json::from_value(json!({"session_id": "s", "config": {"n_items": 3}, "block": []}))
                .unwrap();
        assert_eq!(
            IqSession::start(AdvancePolicy::Immediate, start),
            Err(SessionError::Empty)
        );
    }

    #[test]
    fn immediate_shows_one_item_at_a_time() {
        let mut session = IqSession::start(AdvancePolicy::Immediate, two_item_start()).unwrap();
        assert_eq!(session.total(), 4);
        assert_eq!(session.displayed().len(), 1);
        assert_eq!(session.displayed()[0].item().item_id(), &id("A"));
        assert_eq!(session.commit(&id("B"), "x", Duration::ZERO), Resolution::NotDisplayed);

        let step = session.commit(&id("A"), "2", Duration::from_secs(3));
        assert_eq!(step, Resolution::Recorded(Step::ShowItem(1)));
        assert_eq!(session.displayed()[0].item().item_id(), &id("B"));
        assert_eq!(session.first_displayed_number(), 2);
        assert_eq!(session.answered(), 1);
    }

    #[test]
    fn time_out_records_null_answer_with_full_limit_once() {
        let mut session = IqSession::start(AdvancePolicy::Immediate, two_item_start()).unwrap();
        assert_eq!(tick_n(&mut session, 9), None);
        assert_eq!(session.displayed()[0].remaining(), 1);

        let (expired, step) = session.tick();
        assert_eq!(expired, vec![id("A")]);
        assert_eq!(step, Some(Step::ShowItem(1)));

        let answer = session.block()[0].answer().unwrap();
        assert!(answer.timed_out);
        assert_eq!(answer.answer, None);
        assert!((answer.seconds - 10.0).abs() < f64::EPSILON);
        assert_eq!(session.answered(), 1);
    }

    #[test]
    fn commit_then_expire_keeps_first_answer() {
        let mut session = IqSession::start(AdvancePolicy::ManualGate, two_item_start()).unwrap();
        assert_eq!(
            session.commit(&id("A"), "1", Duration::from_secs(2)),
            Resolution::Recorded(Step::Wait)
        );
        assert_eq!(session.expire(&id("A")), Resolution::AlreadyResolved);
        assert!(!session.block()[0].timer_running());

        let answer = session.block()[0].answer().unwrap();
        assert!(!answer.timed_out);
        assert_eq!(answer.answer.as_deref(), Some("1"));
        assert_eq!(session.answered(), 1);
    }

    #[test]
    fn expire_then_commit_keeps_time_out() {
        let mut session = IqSession::start(AdvancePolicy::ManualGate, two_item_start()).unwrap();
        assert_eq!(session.expire(&id("B")), Resolution::Recorded(Step::Wait));
        assert_eq!(
            session.commit(&id("B"), "x", Duration::from_secs(4)),
            Resolution::AlreadyResolved
        );
        let answer = session.block()[1].answer().unwrap();
        assert!(answer.timed_out);
        assert_eq!(session.answered(), 1);
    }

    #[test]
    fn ticks_after_commit_do_not_record_again() {
        let mut session = IqSession::start(AdvancePolicy::ManualGate, two_item_start()).unwrap();
        session.commit(&id("A"), "1", Duration::from_secs(1));
        let (expired, step) = {
            let mut all = Vec::new();
            let mut last = None;
            for _ in 0..10 {
                let (ids, step) = session.tick();
                all.extend(ids);
                if step.is_some() {
                    last = step;
                }
            }
            (all, last)
        };
        assert_eq!(expired, vec![id("B")]);
        assert_eq!(step, Some(Step::AwaitAdvance));
        assert_eq!(session.submission().answers.len(), 2);
    }

    #[test]
    fn manual_gate_waits_for_every_item_before_advancing() {
        let mut session = IqSession::start(AdvancePolicy::ManualGate, two_item_start()).unwrap();
        assert_eq!(session.displayed().len(), 2);
        assert_eq!(session.advance(), Step::Wait);

        session.commit(&id("A"), "2", Duration::from_secs(3));
        assert_eq!(session.advance(), Step::Wait);
        assert_eq!(session.phase(), SessionPhase::ShowingItem);

        assert_eq!(session.expire(&id("B")), Resolution::Recorded(Step::AwaitAdvance));
        assert!(session.can_advance());
        assert_eq!(session.advance(), Step::Submit);
        assert_eq!(session.phase(), SessionPhase::SubmittingBlock);
    }

    #[test]
    fn manual_gate_does_not_track_changes() {
        let mut session = IqSession::start(AdvancePolicy::ManualGate, two_item_start()).unwrap();
        assert!(!session.change_selection(&id("A"), "1"));
        session.commit(&id("A"), "1", Duration::from_secs(1));
        assert_eq!(session.block()[0].answer().unwrap().changes, None);
    }

    #[test]
    fn immediate_counts_pending_changes() {
        let mut session = IqSession::start(AdvancePolicy::Immediate, two_item_start()).unwrap();
        assert!(session.change_selection(&id("A"), "1"));
        assert!(session.change_selection(&id("A"), "1"));
        assert!(session.change_selection(&id("A"), "2"));
        assert!(session.change_selection(&id("A"), "1"));
        assert!(!session.change_selection(&id("A"), "nope"));
        session.commit(&id("A"), "1", Duration::from_millis(1_400));

        let answer = session.block()[0].answer().unwrap();
        assert_eq!(answer.changes, Some(2));
        assert!((answer.seconds - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let mut session = IqSession::start(AdvancePolicy::Immediate, two_item_start()).unwrap();
        assert_eq!(
            session.commit(&id("A"), "9", Duration::ZERO),
            Resolution::UnknownOption
        );
        assert!(!session.block()[0].is_resolved());
    }

    #[test]
    fn submission_matches_block_contract() {
        let mut session = IqSession::start(AdvancePolicy::ManualGate, two_item_start()).unwrap();
        session.commit(&id("A"), "2", Duration::from_secs(3));
        tick_n(&mut session, 10);
        assert_eq!(session.advance(), Step::Submit);

        let body = serde_json::to_value(session.submission()).unwrap();
        assert_eq!(
            body,
            json!({
                "session_id": "s1",
                "answers": [
                    {"item_id": "A", "answer": "2", "timed_out": false, "seconds": 3.0},
                    {"item_id": "B", "answer": null, "timed_out": true, "seconds": 10.0}
                ]
            })
        );
    }

    #[test]
    fn next_block_replaces_answers_and_done_finalizes() {
        let mut session = IqSession::start(AdvancePolicy::Immediate, two_item_start()).unwrap();
        session.commit(&id("A"), "1", Duration::from_secs(1));
        assert_eq!(
            session.commit(&id("B"), "y", Duration::from_secs(1)),
            Resolution::Recorded(Step::Submit)
        );

        let next: BlockResponse = serde_json::from_value(json!({
            "done": false,
            "block": [{"item_id": "C", "prompt": "C?", "options": ["a"], "time_limit": 5}]
        }))
        .unwrap();
        assert_eq!(session.apply_block_response(next), Step::ShowItem(0));
        assert!(session.submission().answers.is_empty());
        assert_eq!(session.first_displayed_number(), 3);
        assert_eq!(session.displayed()[0].remaining(), 5);

        session.commit(&id("C"), "a", Duration::from_secs(2));
        assert_eq!(
            session.apply_block_response(BlockResponse {
                done: true,
                block: None
            }),
            Step::Finalize
        );
        assert_eq!(session.phase(), SessionPhase::Finalizing);
        session.finish();
        assert_eq!(session.phase(), SessionPhase::Finished);
        assert!(session.displayed().is_empty());
    }

    #[test]
    fn not_done_without_block_stalls() {
        let mut session = IqSession::start(AdvancePolicy::Immediate, two_item_start()).unwrap();
        session.expire(&id("A"));
        session.expire(&id("B"));
        assert_eq!(
            session.apply_block_response(BlockResponse::default()),
            Step::Stalled
        );
        assert_eq!(session.phase(), SessionPhase::SubmittingBlock);
    }

    #[test]
    fn block_response_outside_submission_is_ignored() {
        let mut session = IqSession::start(AdvancePolicy::Immediate, two_item_start()).unwrap();
        assert_eq!(
            session.apply_block_response(BlockResponse {
                done: true,
                block: None
            }),
            Step::Wait
        );
        assert_eq!(session.phase(), SessionPhase::ShowingItem);
    }
}

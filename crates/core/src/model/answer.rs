use serde::{Deserialize, Serialize};

use crate::model::ItemId;

/// A recorded answer for one item, held until its block is submitted.
///
/// `answer` is `None` for time-outs. `changes` is only sent by the
/// auto-advance flow; the batch flow never allows pre-commit changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub item_id: ItemId,
    pub answer: Option<String>,
    pub timed_out: bool,
    pub seconds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<u32>,
}

impl Answer {
    #[must_use]
    pub fn selected(item_id: ItemId, value: String, seconds: f64, changes: Option<u32>) -> Self {
        Self {
            item_id,
            answer: Some(value),
            timed_out: false,
            seconds,
            changes,
        }
    }

    /// A time-out answer: no value, elapsed equal to the full limit.
    #[must_use]
    pub fn timed_out(item_id: ItemId, time_limit: u32, changes: Option<u32>) -> Self {
        Self {
            item_id,
            answer: None,
            timed_out: true,
            seconds: f64::from(time_limit),
            changes,
        }
    }
}

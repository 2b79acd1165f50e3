use std::time::Duration;

/// Lower bound for a user answer's recorded duration, in seconds.
pub const MIN_ANSWER_SECONDS: f64 = 0.1;

/// Outcome of a single one-second tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Still counting; carries the seconds left.
    Remaining(u32),
    /// The countdown reached zero on this tick.
    Expired,
    /// The countdown was already cancelled; nothing happened.
    Inactive,
}

/// Per-item countdown at one-second resolution.
///
/// A countdown is cancelled exactly once, either by a user answer or by its
/// own expiry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Countdown {
    time_limit: u32,
    remaining: u32,
    running: bool,
}

impl Countdown {
    #[must_use]
    pub fn start(time_limit: u32) -> Self {
        Self {
            time_limit,
            remaining: time_limit,
            running: true,
        }
    }

    #[must_use]
    pub fn time_limit(&self) -> u32 {
        self.time_limit
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance by one second. Expiry cancels the countdown.
    pub fn tick(&mut self) -> Tick {
        if !self.running {
            return Tick::Inactive;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            Tick::Expired
        } else {
            Tick::Remaining(self.remaining)
        }
    }

    /// Stop the countdown. Returns `true` only for the call that stopped it.
    pub fn cancel(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }
}

/// Seconds recorded for a user answer: whole seconds, never below 0.1.
#[must_use]
pub fn answer_seconds(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64()).round().max(MIN_ANSWER_SECONDS)
}

/// Reaction time in whole milliseconds, never below 1.
#[must_use]
pub fn reaction_ms(elapsed: Duration) -> u64 {
    let millis = elapsed.as_secs_f64() * 1000.0;
    // Saturating float-to-int cast; reaction times are far below u64::MAX.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = millis.round() as u64;
    rounded.max(1)
}

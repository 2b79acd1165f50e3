/// Where a run loop stopped.
#[derive(Clone, Debug, PartialEq)]
pub enum RunOutcome<T> {
    /// The session never started (start call failed or delivered nothing).
    Aborted,
    /// The intent channel closed while the session was running.
    Abandoned,
    /// An IQ block submit came back empty; the screen stays as it was.
    Stalled,
    Finished(T),
}

impl<T> RunOutcome<T> {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished(_))
    }
}

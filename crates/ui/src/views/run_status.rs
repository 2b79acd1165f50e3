use services::RunOutcome;

/// Where a page's run loop currently stands.
///
/// Never shown as text: a failed loop leaves the page as it was.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Starting,
    Running,
    Aborted,
    Stalled,
    Abandoned,
    Finished,
}

impl RunStatus {
    #[must_use]
    pub fn from_outcome<T>(outcome: &RunOutcome<T>) -> Self {
        match outcome {
            RunOutcome::Aborted => Self::Aborted,
            RunOutcome::Abandoned => Self::Abandoned,
            RunOutcome::Stalled => Self::Stalled,
            RunOutcome::Finished(_) => Self::Finished,
        }
    }

    /// Value of the page's `data-run` attribute.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Aborted => "aborted",
            Self::Stalled => "stalled",
            Self::Abandoned => "abandoned",
            Self::Finished => "finished",
        }
    }
}

use thiserror::Error;

/// Errors raised while building session state from backend payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session start returned no items")]
    Empty,
    #[error("payload is missing `{field}`")]
    MissingField { field: &'static str },
    #[error("malformed payload: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by a `JsonTransport`.
///
/// These never reach the pages: `ApiClient` logs them and yields `None`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    #[error("request path `{path}` cannot be resolved: {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("response body is not valid json: {0}")]
    Malformed(String),
}

/// Errors emitted while reading configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid api base url `{0}`")]
    InvalidBaseUrl(String),
    #[error("invalid request timeout `{0}`")]
    InvalidTimeout(String),
    #[error("unknown advance policy `{0}` (expected `immediate` or `manual`)")]
    InvalidPolicy(String),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

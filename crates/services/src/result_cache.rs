use std::sync::Arc;

use cogtest_core::model::{SessionId, TestResult};
use storage::repository::KeyValueStore;

pub const LAST_RESULT_KEY: &str = "iq_last_result";
pub const SESSION_ID_KEY: &str = "iq_session_id";

/// Single-slot cache of the most recent IQ result.
///
/// Every write replaces the previous result. Reads never fail: a missing,
/// corrupt or unreadable entry is reported as `None`.
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn KeyValueStore>,
}

impl ResultCache {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persist `result`, replacing any earlier one. `None` is a no-op.
    pub async fn save(&self, result: Option<&TestResult>) {
        let Some(result) = result else {
            return;
        };
        let payload = match serde_json::to_string(result) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(error = %err, "result_encode_error");
                return;
            }
        };
        if let Err(err) = self.store.set(LAST_RESULT_KEY, &payload).await {
            tracing::warn!(key = LAST_RESULT_KEY, error = %err, "result_store_error");
        }
    }

    pub async fn load(&self) -> Option<TestResult> {
        let raw = match self.store.get(LAST_RESULT_KEY).await {
            Ok(raw) => raw?,
            Err(err) => {
                tracing::warn!(key = LAST_RESULT_KEY, error = %err, "result_store_error");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(result) => Some(result),
            Err(err) => {
                tracing::info!(error = %err, "result_parse_error");
                None
            }
        }
    }

    pub async fn clear(&self) {
        if let Err(err) = self.store.remove(LAST_RESULT_KEY).await {
            tracing::warn!(key = LAST_RESULT_KEY, error = %err, "result_store_error");
        }
    }

    /// Note the id of the running session. Nothing reads it back.
    pub async fn remember_session(&self, session_id: &SessionId) {
        if let Err(err) = self.store.set(SESSION_ID_KEY, session_id.as_str()).await {
            tracing::warn!(key = SESSION_ID_KEY, error = %err, "session_store_error");
        }
    }
}

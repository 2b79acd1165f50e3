#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cogtest_core::model::TestResult;
use cogtest_core::session::IqSession;
use cogtest_core::trial::{TrialSession, TrialSummary};
use serde_json::Value;
use services::api::{ApiRequest, JsonTransport};
use services::error::TransportError;
use services::iq_loop::IqView;
use services::trial_loop::TrialView;

/// In-process backend: queued replies per path, every request recorded.
///
/// A path with no queued reply fails like an unreachable server.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    replies: Arc<Mutex<HashMap<String, VecDeque<Option<Value>>>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply for `path`.
    pub fn reply(&self, path: &str, body: Value) -> &Self {
        self.push(path, Some(body))
    }

    /// Queue a failed request for `path`.
    pub fn fail(&self, path: &str) -> &Self {
        self.push(path, None)
    }

    fn push(&self, path: &str, reply: Option<Value>) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry(path.to_owned())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn bodies_for(&self, path: &str) -> Vec<Value> {
        self.requests()
            .into_iter()
            .filter(|request| request.path == path)
            .filter_map(|request| request.body)
            .collect()
    }
}

#[async_trait]
impl JsonTransport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<Value, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&request.path)
            .and_then(VecDeque::pop_front)
            .flatten();
        reply.ok_or_else(|| TransportError::Malformed(format!("no reply for {}", request.path)))
    }
}

/// Records what the IQ loop asked the page to show.
#[derive(Default)]
pub struct RecordingIqView {
    pub renders: Vec<IqSession>,
    pub completed: Option<Option<TestResult>>,
}

impl IqView for RecordingIqView {
    fn render(&mut self, session: &IqSession) {
        self.renders.push(session.clone());
    }

    fn complete(&mut self, result: Option<&TestResult>) {
        self.completed = Some(result.cloned());
    }
}

#[derive(Default)]
pub struct RecordingTrialView {
    pub renders: Vec<TrialSession>,
    pub feedback: Vec<Option<bool>>,
    pub completed: Option<TrialSummary>,
}

impl TrialView for RecordingTrialView {
    fn render(&mut self, session: &TrialSession) {
        self.renders.push(session.clone());
    }

    fn feedback(&mut self, correct: Option<bool>) {
        self.feedback.push(correct);
    }

    fn complete(&mut self, summary: &TrialSummary) {
        self.completed = Some(summary.clone());
    }
}

use serde::{Deserialize, Serialize};

/// Final outcome of an IQ session, produced by the backend at finish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub iq: i64,
    pub label: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_sec: Option<u64>,
}

/// Score of the combined IQ + Stroop battery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixedScore {
    pub score: f64,
    pub iq_pct: f64,
    pub stroop_pct: f64,
}

/// Score and qualitative profile of the Stroop task-switching battery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StroopScore {
    pub score: f64,
    #[serde(default)]
    pub profile: String,
}

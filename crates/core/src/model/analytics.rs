use serde::{Deserialize, Serialize};

/// One entry of the `/api/tests` catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestInfo {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub published_version: Option<u32>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Envelope of `/api/tests`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TestCatalog {
    #[serde(default)]
    pub tests: Vec<TestInfo>,
}

/// Aggregate metrics from `/api/analytics/summary`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    #[serde(default)]
    pub active_tests: Option<u32>,
    #[serde(default)]
    pub finish_rate: Option<f64>,
    #[serde(default)]
    pub avg_time_sec: Option<u64>,
}

/// Labelled series used by the funnel, profile and drop-off charts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartSeries {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub values: Vec<f64>,
}

impl ChartSeries {
    #[must_use]
    pub fn new(labels: &[&str], values: &[f64]) -> Self {
        Self {
            labels: labels.iter().map(|label| (*label).to_owned()).collect(),
            values: values.to_vec(),
        }
    }
}

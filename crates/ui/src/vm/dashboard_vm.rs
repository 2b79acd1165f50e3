use cogtest_core::model::{AnalyticsSummary, ChartSeries, TestInfo};

use super::time_fmt::{MISSING, format_time};

pub const DEFAULT_HERO_TITLE: &str = "General IQ Test";
pub const DEFAULT_HERO_SUBTITLE: &str = "Ready to start";
pub const NO_TESTS: &str = "No tests available.";
pub const NO_DATA: &str = "No data";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryVm {
    pub active_tests: String,
    pub finish_rate: String,
    pub avg_time: String,
}

#[must_use]
pub fn map_summary(summary: Option<&AnalyticsSummary>) -> SummaryVm {
    let Some(summary) = summary else {
        return SummaryVm {
            active_tests: MISSING.to_owned(),
            finish_rate: MISSING.to_owned(),
            avg_time: MISSING.to_owned(),
        };
    };
    SummaryVm {
        active_tests: summary
            .active_tests
            .map_or_else(|| MISSING.to_owned(), |count| count.to_string()),
        finish_rate: format!("{}%", summary.finish_rate.unwrap_or(0.0)),
        avg_time: format_time(summary.avg_time_sec),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeroVm {
    pub title: String,
    pub subtitle: String,
}

/// Hero block for the first test of the catalog.
#[must_use]
pub fn map_hero(first: Option<&TestInfo>) -> HeroVm {
    match first {
        None => HeroVm {
            title: DEFAULT_HERO_TITLE.to_owned(),
            subtitle: DEFAULT_HERO_SUBTITLE.to_owned(),
        },
        Some(test) => HeroVm {
            title: test.title.clone(),
            subtitle: format!("Version {}", version_label(test.published_version)),
        },
    }
}

fn version_label(version: Option<u32>) -> String {
    version.map_or_else(|| MISSING.to_owned(), |v| v.to_string())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestRowVm {
    pub slug: String,
    pub title: String,
    pub lang: String,
    pub version: String,
    pub status: &'static str,
    pub pill_class: &'static str,
}

#[must_use]
pub fn map_test_rows(tests: &[TestInfo]) -> Vec<TestRowVm> {
    tests
        .iter()
        .map(|test| TestRowVm {
            slug: test.slug.clone(),
            title: test.title.clone(),
            lang: test
                .lang
                .as_deref()
                .filter(|lang| !lang.is_empty())
                .unwrap_or("es")
                .to_uppercase(),
            version: version_label(test.published_version),
            status: if test.is_active { "published" } else { "inactive" },
            pill_class: if test.is_active { "pill" } else { "pill ghost" },
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct BarVm {
    pub label: String,
    pub value: String,
    /// Bar length relative to the largest value, 0..=100.
    pub width_pct: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartVm {
    pub bars: Vec<BarVm>,
}

impl ChartVm {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

fn bars(labels: &[String], values: &[f64]) -> Vec<BarVm> {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    labels
        .iter()
        .zip(values)
        .map(|(label, value)| BarVm {
            label: label.clone(),
            value: value.to_string(),
            width_pct: if max > 0.0 {
                (value / max * 100.0).clamp(0.0, 100.0)
            } else {
                0.0
            },
        })
        .collect()
}

fn chart_or(series: Option<&ChartSeries>, labels: &[&str], values: &[f64]) -> ChartVm {
    let fallback = ChartSeries::new(labels, values);
    let labels = series
        .map(|series| &series.labels)
        .filter(|labels| !labels.is_empty())
        .unwrap_or(&fallback.labels);
    let values = series
        .map(|series| &series.values)
        .filter(|values| !values.is_empty())
        .unwrap_or(&fallback.values);
    ChartVm {
        bars: bars(labels, values),
    }
}

/// Start/finish funnel; falls back to a zeroed two-step funnel.
#[must_use]
pub fn map_funnel(series: Option<&ChartSeries>) -> ChartVm {
    chart_or(series, &["Start", "Finish"], &[0.0, 0.0])
}

/// Result profile distribution; falls back to a single "No data" slice.
#[must_use]
pub fn map_profiles(series: Option<&ChartSeries>) -> ChartVm {
    chart_or(series, &[NO_DATA], &[0.0])
}

/// Per-question drop-off; empty when the backend has nothing.
#[must_use]
pub fn map_dropoff(series: Option<&ChartSeries>) -> ChartVm {
    chart_or(series, &[], &[])
}

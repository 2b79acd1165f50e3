//! Presentational pieces shared by the dashboard and analytics pages.

use dioxus::prelude::*;

use crate::vm::{ChartVm, NO_TESTS, ResultVm, SummaryVm, TestRowVm};

#[component]
pub fn MetricGrid(summary: SummaryVm) -> Element {
    rsx! {
        div { class: "metrics",
            Metric { label: "Active tests", value: summary.active_tests }
            Metric { label: "Finish rate", value: summary.finish_rate }
            Metric { label: "Average time", value: summary.avg_time }
        }
    }
}

#[component]
fn Metric(label: &'static str, value: String) -> Element {
    rsx! {
        div { class: "metric",
            span { class: "metric-label", "{label}" }
            strong { class: "metric-value", "{value}" }
        }
    }
}

#[component]
pub fn TestsTable(rows: Vec<TestRowVm>) -> Element {
    rsx! {
        table { class: "tests-table",
            thead {
                tr {
                    th { "Slug" }
                    th { "Title" }
                    th { "Language" }
                    th { "Version" }
                    th { "Status" }
                }
            }
            tbody {
                if rows.is_empty() {
                    tr {
                        td { colspan: "5", class: "empty", "{NO_TESTS}" }
                    }
                }
                for row in rows {
                    tr { key: "{row.slug}",
                        td { "{row.slug}" }
                        td { "{row.title}" }
                        td { "{row.lang}" }
                        td { "{row.version}" }
                        td {
                            span { class: row.pill_class, "{row.status}" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn BarChart(title: &'static str, chart: ChartVm) -> Element {
    rsx! {
        section { class: "chart reveal",
            h3 { "{title}" }
            if chart.is_empty() {
                p { class: "chart-empty", "no data" }
            }
            for bar in chart.bars {
                div { class: "bar-row",
                    span { class: "bar-label", "{bar.label}" }
                    div { class: "bar-track",
                        div { class: "bar", style: "width: {bar.width_pct}%;" }
                    }
                    span { class: "bar-value", "{bar.value}" }
                }
            }
        }
    }
}

/// Result summary; the scale marker is optional so the analytics card can
/// reuse it.
#[component]
pub fn ResultCard(result: ResultVm, show_marker: bool) -> Element {
    rsx! {
        div { class: "result-card",
            h3 { "{result.iq}" }
            p { class: "result-label", "{result.label}" }
            p { class: "result-score", "{result.score}" }
            if show_marker {
                div { class: "scale",
                    div { class: "marker", style: "left: {result.marker_pct}%;" }
                }
            }
        }
    }
}

use cogtest_core::model::TestResult;
use serde_json::json;
use services::api::paths;
use services::RunLoopConfig;

use super::test_harness::{
    FakeBackend, ViewKind, setup_view_harness, setup_view_harness_with_config,
};

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_dashboard() {
    let backend = FakeBackend::default();
    backend
        .reply(
            paths::TESTS,
            json!({"tests": [
                {"slug": "iq-general", "title": "General Reasoning", "lang": "en", "is_active": true, "published_version": 4},
                {"slug": "draft", "title": "Draft", "is_active": false}
            ]}),
        )
        .reply(
            paths::ANALYTICS_SUMMARY,
            json!({"active_tests": 2, "finish_rate": 64.5, "avg_time_sec": 754}),
        );
    let mut harness = setup_view_harness(ViewKind::Home, backend);

    harness.rebuild();
    let html = harness.settle_until("General Reasoning").await;

    assert!(html.contains("Version 4"), "missing hero version in {html}");
    assert!(html.contains("64.5%"), "missing finish rate in {html}");
    assert!(html.contains("12:34"), "missing avg time in {html}");
    assert!(html.contains("pill ghost"), "missing inactive pill in {html}");
    assert!(html.contains("EN"), "missing language in {html}");
    // Chart endpoints were not scripted; their fallbacks render instead.
    assert!(html.contains("No data"), "missing profiles fallback in {html}");
    assert!(html.contains("no data"), "missing dropoff fallback in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_survives_unreachable_backend() {
    let mut harness = setup_view_harness(ViewKind::Home, FakeBackend::default());

    harness.rebuild();
    let html = harness.settle_until("General IQ Test").await;

    assert!(html.contains("Ready to start"), "missing hero default in {html}");
    assert!(html.contains("No tests available."), "missing empty row in {html}");
    assert!(html.contains("--"), "missing metric placeholder in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn result_view_smoke_renders_cached_result() {
    let mut harness = setup_view_harness(ViewKind::Result, FakeBackend::default());
    harness
        .cache
        .save(Some(&TestResult {
            iq: 115,
            label: "Above average".into(),
            score: 0.75,
            duration_sec: Some(600),
        }))
        .await;

    harness.rebuild();
    let html = harness.settle_until("IQ estimate: 115").await;

    assert!(html.contains("Above average"), "missing label in {html}");
    assert!(html.contains("Score: 0.75"), "missing score in {html}");
    assert!(html.contains("left: 50%"), "missing marker in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn result_view_smoke_without_result() {
    let mut harness = setup_view_harness(ViewKind::Result, FakeBackend::default());

    harness.rebuild();
    let html = harness.settle_until("IQ estimate: --").await;

    assert!(
        html.contains("Complete the test to see your result."),
        "missing empty label in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn analytics_view_smoke_shows_last_result_without_marker() {
    let mut harness = setup_view_harness(ViewKind::Analytics, FakeBackend::default());
    harness
        .cache
        .save(Some(&TestResult {
            iq: 98,
            label: "Average".into(),
            score: 0.5,
            duration_sec: None,
        }))
        .await;

    harness.rebuild();
    let html = harness.settle_until("IQ estimate: 98").await;

    assert!(html.contains("Score: 0.5"), "missing score in {html}");
    assert!(!html.contains("class=\"marker\""), "unexpected marker in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn iq_test_view_smoke_renders_first_question() {
    let backend = FakeBackend::default();
    backend.reply(
        &paths::iq_start(3),
        json!({
            "session_id": "s1",
            "config": {"n_items": 12},
            "block": [
                {"item_id": "A", "prompt": "Which number comes next?", "options": ["4", "8"], "time_limit": 30},
                {"item_id": "B", "prompt": "B?", "options": ["x", "y"], "time_limit": 30}
            ]
        }),
    );
    let mut harness = setup_view_harness(ViewKind::IqTest, backend);

    harness.rebuild();
    let html = harness.settle_until("Which number comes next?").await;

    assert!(html.contains("Question 1 / 12"), "missing progress in {html}");
    assert!(html.contains("Time left: 30s"), "missing timer in {html}");
    assert!(!html.contains("B?"), "second item shown early in {html}");
    assert!(!html.contains("test-compact"), "unexpected compact layout in {html}");
    assert_eq!(harness.backend.requests()[0].path, paths::iq_start(3));
}

#[tokio::test(flavor = "current_thread")]
async fn iq_test_view_smoke_compact_manual_gate() {
    let backend = FakeBackend::default();
    backend.reply(
        &paths::iq_start(1),
        json!({
            "session_id": "s1",
            "block": [{"item_id": "A", "prompt": "Only item", "options": ["1", "2"], "time_limit": 30}]
        }),
    );
    let config = RunLoopConfig::default()
        .with_policy(cogtest_core::session::AdvancePolicy::ManualGate)
        .with_viewport(600, 700);
    let mut harness = setup_view_harness_with_config(ViewKind::IqTest, backend, config);

    harness.rebuild();
    let html = harness.settle_until("Only item").await;

    assert!(html.contains("test-compact"), "missing compact class in {html}");
    assert!(html.contains("Next"), "missing advance button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn iq_test_view_smoke_failed_start_stays_silent() {
    let mut harness = setup_view_harness(ViewKind::IqTest, FakeBackend::default());

    harness.rebuild();
    let starting = harness.render();
    assert!(starting.contains("data-run="), "missing run marker in {starting}");
    assert!(!starting.contains("Loading"), "unexpected spinner text in {starting}");

    let html = harness.settle_until("data-run=\"aborted\"").await;

    assert!(html.contains("data-run=\"aborted\""), "loop did not abort: {html}");
    assert!(!html.contains("try again"), "unexpected error text in {html}");
    assert!(!html.contains("question-card"), "unexpected question in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn stroop_view_smoke_failed_start_stays_silent() {
    let mut harness = setup_view_harness(ViewKind::Stroop, FakeBackend::default());

    harness.rebuild();
    let html = harness.settle_until("data-run=\"aborted\"").await;

    assert!(html.contains("Stroop task switching"), "missing title in {html}");
    assert!(html.contains("data-run=\"aborted\""), "loop did not abort: {html}");
    assert!(!html.contains("try again"), "unexpected error text in {html}");
    assert!(!html.contains("could not"), "unexpected error text in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn stroop_view_smoke_renders_trial() {
    let backend = FakeBackend::default();
    backend.reply(
        paths::STROOP_START,
        json!({"session_id": "st", "trial": {"word": "VERDE", "ink": "rojo"}}),
    );
    let mut harness = setup_view_harness(ViewKind::Stroop, backend);

    harness.rebuild();
    let html = harness.settle_until("VERDE").await;

    assert!(html.contains("Trial 1"), "missing progress in {html}");
    assert!(html.contains("#ef4444"), "missing ink colour in {html}");
    assert!(html.contains("In progress"), "missing feedback in {html}");
    assert!(html.contains("AMARILLO"), "missing palette option in {html}");
    assert!(html.contains("Finish"), "missing finish button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn mixed_view_smoke_renders_iq_item() {
    let backend = FakeBackend::default();
    backend.reply(
        paths::MIXED_START,
        json!({
            "session_id": "mx",
            "total": 10,
            "item": {"item_id": "Q1", "kind": "iq", "payload": {"prompt": "2, 4, 8, ?", "options": ["12", "16"]}}
        }),
    );
    let mut harness = setup_view_harness(ViewKind::Mixed, backend);

    harness.rebuild();
    let html = harness.settle_until("2, 4, 8, ?").await;

    assert!(html.contains("Item 1 / 10"), "missing progress in {html}");
    assert!(html.contains("16"), "missing option in {html}");
    assert!(!html.contains("Finish"), "mixed battery has no finish button: {html}");
}

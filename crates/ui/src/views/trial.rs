use cogtest_core::trial::{BatteryKind, TrialSession, TrialSummary};
use dioxus::prelude::*;
use services::{StroopPalette, TrialIntent, TrialView};
use tokio::sync::mpsc;

use crate::context::AppContext;
use crate::views::run_status::RunStatus;
use crate::vm::{
    StimulusVm, TrialPageVm, TrialSummaryVm, feedback_label, map_trial_page, map_trial_summary,
};

const INTENT_BUFFER: usize = 32;

struct SignalTrialView {
    palette: StroopPalette,
    page: Signal<Option<TrialPageVm>>,
    feedback: Signal<Option<bool>>,
    summary: Signal<Option<TrialSummaryVm>>,
    status: Signal<RunStatus>,
}

impl TrialView for SignalTrialView {
    fn render(&mut self, session: &TrialSession) {
        self.page.set(Some(map_trial_page(session, &self.palette)));
        if *self.status.peek() == RunStatus::Starting {
            self.status.set(RunStatus::Running);
        }
    }

    fn feedback(&mut self, correct: Option<bool>) {
        self.feedback.set(correct);
    }

    fn complete(&mut self, summary: &TrialSummary) {
        self.summary.set(Some(map_trial_summary(summary)));
    }
}

#[component]
pub fn StroopView() -> Element {
    rsx! {
        TrialBattery { kind: BatteryKind::Stroop, title: "Stroop task switching" }
    }
}

#[component]
pub fn MixedView() -> Element {
    rsx! {
        TrialBattery { kind: BatteryKind::Mixed, title: "Mixed battery" }
    }
}

#[component]
fn TrialBattery(kind: BatteryKind, title: &'static str) -> Element {
    let ctx = use_context::<AppContext>();
    let compact = ctx.compact();
    let page = use_signal(|| None::<TrialPageVm>);
    let feedback = use_signal(|| None::<bool>);
    let summary = use_signal(|| None::<TrialSummaryVm>);
    let mut status = use_signal(|| RunStatus::Starting);

    let intents = use_hook(|| {
        let (tx, rx) = mpsc::channel(INTENT_BUFFER);
        let run_loop = ctx.trial_loop(kind);
        let palette = ctx.config().palette.clone();
        spawn(async move {
            let mut view = SignalTrialView {
                palette,
                page,
                feedback,
                summary,
                status,
            };
            let outcome = run_loop.run(&mut view, rx).await;
            status.set(RunStatus::from_outcome(&outcome));
        });
        tx
    });

    let on_intent = use_callback(move |intent: TrialIntent| {
        if let Err(err) = intents.try_send(intent) {
            tracing::debug!(kind = ?kind, error = %err, "trial intent dropped");
        }
    });

    let page_class = if compact {
        "page test-page test-compact"
    } else {
        "page test-page"
    };
    let finished = summary.read().is_some();

    rsx! {
        div { class: page_class, "data-run": status().as_str(),
            h2 { "{title}" }
            if let Some(result) = summary() {
                section { class: "trial-summary reveal",
                    p { class: "headline", "{result.headline}" }
                    if let Some(detail) = result.detail {
                        p { class: "profile", "{detail}" }
                    }
                }
            } else if let Some(vm) = page() {
                div { class: "test-header",
                    span { class: "progress", "{vm.progress}" }
                    if kind == BatteryKind::Stroop {
                        span { class: "feedback", "{feedback_label(feedback())}" }
                    }
                }
                if let Some(hint) = vm.hint {
                    p { class: "hint", "{hint}" }
                }
                Stimulus { stimulus: vm.stimulus.clone() }
                div { class: "options",
                    for choice in vm.choices.clone() {
                        button {
                            key: "{choice.value}",
                            class: "option",
                            onclick: {
                                let value = choice.value.clone();
                                move |_| on_intent.call(TrialIntent::Respond(value.clone()))
                            },
                            "{choice.label}"
                        }
                    }
                }
            }
            if kind == BatteryKind::Stroop && !finished {
                button {
                    class: "btn ghost",
                    onclick: move |_| on_intent.call(TrialIntent::Finish),
                    "Finish"
                }
            }
        }
    }
}

#[component]
fn Stimulus(stimulus: StimulusVm) -> Element {
    match stimulus {
        StimulusVm::Word { word, color } => rsx! {
            div { class: "stimulus",
                div { class: "shape", style: "background-color: {color};" }
                p { class: "word", style: "color: {color};", "{word}" }
            }
        },
        StimulusVm::Question { prompt } => rsx! {
            div { class: "stimulus",
                p { class: "prompt", "{prompt}" }
            }
        },
    }
}

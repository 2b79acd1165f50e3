use cogtest_core::model::{ItemId, TestResult};
use cogtest_core::session::IqSession;
use dioxus::prelude::*;
use dioxus_router::use_navigator;
use services::{IqIntent, IqView};
use tokio::sync::mpsc;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::run_status::RunStatus;
use crate::vm::{IqPageVm, OptionVm, PatternVm, QuestionCardVm, map_iq_page};

const INTENT_BUFFER: usize = 32;

/// Pushes loop snapshots into the page's signals.
struct SignalIqView {
    page: Signal<Option<IqPageVm>>,
    status: Signal<RunStatus>,
}

impl IqView for SignalIqView {
    fn render(&mut self, session: &IqSession) {
        self.page.set(Some(map_iq_page(session)));
        if *self.status.peek() == RunStatus::Starting {
            self.status.set(RunStatus::Running);
        }
    }

    fn complete(&mut self, _result: Option<&TestResult>) {
        self.status.set(RunStatus::Finished);
    }
}

#[component]
pub fn IqTestView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let compact = ctx.compact();
    let page = use_signal(|| None::<IqPageVm>);
    let mut status = use_signal(|| RunStatus::Starting);

    let intents = use_hook(|| {
        let (tx, rx) = mpsc::channel(INTENT_BUFFER);
        let run_loop = ctx.iq_loop();
        spawn(async move {
            let mut view = SignalIqView { page, status };
            let outcome = run_loop.run(&mut view, rx).await;
            status.set(RunStatus::from_outcome(&outcome));
            if outcome.is_finished() {
                navigator.push(Route::ResultPage {});
            }
        });
        tx
    });

    let on_intent = use_callback(move |intent: IqIntent| {
        if let Err(err) = intents.try_send(intent) {
            tracing::debug!(error = %err, "iq intent dropped");
        }
    });

    let page_class = if compact {
        "page test-page test-compact"
    } else {
        "page test-page"
    };

    rsx! {
        div { class: page_class, "data-run": status().as_str(),
            if let Some(vm) = page() {
                div { class: "test-header",
                    span { class: "progress", "{vm.progress}" }
                    span { class: "timer", "{vm.timer}" }
                }
                div { class: "question-grid",
                    for card in vm.cards.clone() {
                        QuestionCard { key: "{card.item_id}", card, on_intent }
                    }
                }
                if vm.show_advance {
                    button {
                        class: "btn primary",
                        disabled: !vm.can_advance,
                        onclick: move |_| on_intent.call(IqIntent::Advance),
                        "Next"
                    }
                }
            }
        }
    }
}

#[component]
fn QuestionCard(card: QuestionCardVm, on_intent: Callback<IqIntent>) -> Element {
    let card_class = if card.timed_out {
        "question-card timed-out"
    } else {
        "question-card"
    };
    rsx! {
        article { class: card_class,
            header {
                span { class: "question-number", "{card.number}" }
                span { class: "card-timer", "{card.timer}" }
            }
            if let Some(base) = card.base_visual.clone() {
                div { class: "base-visual", Visual { pattern: base } }
            }
            p { class: "prompt", "{card.prompt}" }
            div { class: "options",
                for option in card.options.clone() {
                    OptionButton {
                        key: "{option.value}",
                        item_id: card.item_id.clone(),
                        option,
                        on_intent,
                    }
                }
            }
        }
    }
}

#[component]
fn OptionButton(item_id: String, option: OptionVm, on_intent: Callback<IqIntent>) -> Element {
    let value = option.value.clone();
    rsx! {
        button {
            class: if option.active { "option active" } else { "option" },
            disabled: option.disabled,
            onclick: move |_| {
                on_intent.call(IqIntent::Answer {
                    item_id: ItemId::new(item_id.clone()),
                    value: value.clone(),
                });
            },
            match option.visual.clone() {
                Some(pattern) => rsx! { Visual { pattern } },
                None => rsx! { span { "{option.label}" } },
            }
        }
    }
}

#[component]
fn Visual(pattern: PatternVm) -> Element {
    match pattern {
        PatternVm::Image { src, alt } => rsx! { img { src, alt } },
        PatternVm::Text(text) => rsx! { pre { class: "pattern", "{text}" } },
    }
}

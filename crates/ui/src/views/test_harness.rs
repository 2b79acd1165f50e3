use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use serde_json::Value;
use services::api::{ApiRequest, JsonTransport};
use services::{AppServices, ResultCache, RunLoopConfig, TransportError};

use crate::context::{UiApp, build_app_context};
use crate::views::{AnalyticsView, HomeView, IqTestView, MixedView, ResultView, StroopView};

/// Canned backend for view tests; unscripted paths fail.
#[derive(Clone, Default)]
pub struct FakeBackend {
    replies: Arc<Mutex<HashMap<String, VecDeque<Value>>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl FakeBackend {
    pub fn reply(&self, path: &str, body: Value) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry(path.to_owned())
            .or_default()
            .push_back(body);
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl JsonTransport for FakeBackend {
    async fn send(&self, request: &ApiRequest) -> Result<Value, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .get_mut(&request.path)
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| TransportError::Malformed(format!("unscripted {}", request.path)))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    IqTest,
    Stroop,
    Mixed,
    Result,
    Analytics,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<AppServices>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::IqTest => rsx! { IqTestView {} },
        ViewKind::Stroop => rsx! { StroopView {} },
        ViewKind::Mixed => rsx! { MixedView {} },
        ViewKind::Result => rsx! { ResultView {} },
        ViewKind::Analytics => rsx! { AnalyticsView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub backend: FakeBackend,
    pub cache: ResultCache,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Drive until `needle` shows up or the attempts run out.
    pub async fn settle_until(&mut self, needle: &str) -> String {
        for _ in 0..20 {
            self.drive_async().await;
            let html = self.render();
            if html.contains(needle) {
                return html;
            }
        }
        self.render()
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, backend: FakeBackend) -> ViewHarness {
    setup_view_harness_with_config(view, backend, RunLoopConfig::default())
}

pub fn setup_view_harness_with_config(
    view: ViewKind,
    backend: FakeBackend,
    config: RunLoopConfig,
) -> ViewHarness {
    let app = Arc::new(AppServices::in_memory(Arc::new(backend.clone()), config));
    let cache = app.result_cache();
    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });
    ViewHarness {
        dom,
        backend,
        cache,
    }
}

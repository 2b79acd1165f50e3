use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::widgets::{BarChart, MetricGrid, TestsTable};
use crate::views::{ViewState, view_state_from_resource};
use crate::vm::{
    ChartVm, HeroVm, SummaryVm, TestRowVm, map_dropoff, map_funnel, map_hero, map_profiles,
    map_summary, map_test_rows,
};

#[derive(Clone, Debug, PartialEq)]
struct HomeData {
    hero: HeroVm,
    summary: SummaryVm,
    rows: Vec<TestRowVm>,
    funnel: ChartVm,
    profiles: ChartVm,
    dropoff: ChartVm,
}

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let dashboard = ctx.dashboard();

    let resource = use_resource(move || {
        let dashboard = dashboard.clone();
        async move {
            let data = dashboard.load().await;
            HomeData {
                hero: map_hero(data.tests.first()),
                summary: map_summary(data.summary.as_ref()),
                rows: map_test_rows(&data.tests),
                funnel: map_funnel(data.funnel.as_ref()),
                profiles: map_profiles(data.profiles.as_ref()),
                dropoff: map_dropoff(data.dropoff.as_ref()),
            }
        }
    });

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page",
            match state {
                ViewState::Loading => rsx! {},
                ViewState::Ready(data) => rsx! {
                    section { class: "hero reveal",
                        h2 { "{data.hero.title}" }
                        p { class: "hero-subtitle", "{data.hero.subtitle}" }
                        button {
                            class: "btn primary",
                            onclick: move |_| {
                                navigator.push(Route::Mixed {});
                            },
                            "Start test"
                        }
                    }
                    section { class: "reveal",
                        MetricGrid { summary: data.summary }
                    }
                    section { class: "reveal",
                        h3 { "Tests" }
                        TestsTable { rows: data.rows }
                    }
                    div { class: "charts",
                        BarChart { title: "Funnel", chart: data.funnel }
                        BarChart { title: "Profiles", chart: data.profiles }
                        BarChart { title: "Drop-off", chart: data.dropoff }
                    }
                },
            }
        }
    }
}

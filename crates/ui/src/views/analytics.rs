use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::widgets::{BarChart, MetricGrid, ResultCard};
use crate::views::{ViewState, view_state_from_resource};
use crate::vm::{
    ChartVm, ResultVm, SummaryVm, map_dropoff, map_funnel, map_profiles, map_result, map_summary,
};

#[derive(Clone, Debug, PartialEq)]
struct AnalyticsData {
    last: ResultVm,
    summary: SummaryVm,
    funnel: ChartVm,
    profiles: ChartVm,
    dropoff: ChartVm,
}

#[component]
pub fn AnalyticsView() -> Element {
    let ctx = use_context::<AppContext>();
    let dashboard = ctx.dashboard();
    let cache = ctx.result_cache();

    let resource = use_resource(move || {
        let dashboard = dashboard.clone();
        let cache = cache.clone();
        async move {
            let (data, last) = tokio::join!(dashboard.load(), cache.load());
            AnalyticsData {
                last: map_result(last.as_ref()),
                summary: map_summary(data.summary.as_ref()),
                funnel: map_funnel(data.funnel.as_ref()),
                profiles: map_profiles(data.profiles.as_ref()),
                dropoff: map_dropoff(data.dropoff.as_ref()),
            }
        }
    });

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page",
            h2 { "Analytics" }
            match state {
                ViewState::Loading => rsx! {},
                ViewState::Ready(data) => rsx! {
                    section { class: "reveal",
                        h3 { "Last result" }
                        ResultCard { result: data.last, show_marker: false }
                    }
                    section { class: "reveal",
                        MetricGrid { summary: data.summary }
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

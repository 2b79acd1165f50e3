use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{AnalyticsView, HomeView, IqTestView, MixedView, ResultView, StroopView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/test", IqTestView)] Test {},
        #[route("/stroop", StroopView)] Stroop {},
        #[route("/test-mixed", MixedView)] Mixed {},
        #[route("/resultado", ResultView)] ResultPage {},
        #[route("/analitica", AnalyticsView)] Analytics {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Cogtest" }
            ul {
                li { Link { to: Route::Home {}, active_class: "active", "Dashboard" } }
                li { Link { to: Route::Test {}, active_class: "active", "IQ test" } }
                li { Link { to: Route::Stroop {}, active_class: "active", "Stroop" } }
                li { Link { to: Route::Mixed {}, active_class: "active", "Mixed" } }
                li { Link { to: Route::ResultPage {}, active_class: "active", "Result" } }
                li { Link { to: Route::Analytics {}, active_class: "active", "Analytics" } }
            }
        }
    }
}

use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::widgets::ResultCard;
use crate::views::{ViewState, view_state_from_resource};
use crate::vm::map_result;

#[component]
pub fn ResultView() -> Element {
    let ctx = use_context::<AppContext>();
    let cache = ctx.result_cache();

    let resource = use_resource(move || {
        let cache = cache.clone();
        async move {
            let result = cache.load().await;
            map_result(result.as_ref())
        }
    });

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page",
            h2 { "Your result" }
            match state {
                ViewState::Loading => rsx! {},
                ViewState::Ready(result) => rsx! {
                    section { class: "reveal",
                        ResultCard { result, show_marker: true }
                    }
                    Link { class: "btn", to: Route::Test {}, "Take the test again" }
                },
            }
        }
    }
}

use dioxus::prelude::*;

/// Page data loads never fail as a whole; every widget carries its own fallback.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(resource: Resource<T>) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Ready => resource
            .value()
            .read()
            .as_ref()
            .map_or(ViewState::Loading, |data| ViewState::Ready(data.clone())),
        UseResourceState::Pending | UseResourceState::Paused | UseResourceState::Stopped => {
            ViewState::Loading
        }
    }
}

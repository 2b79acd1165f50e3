mod analytics;
mod home;
mod iq_test;
mod result;
mod run_status;
mod state;
mod trial;
mod widgets;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use analytics::AnalyticsView;
pub use home::HomeView;
pub use iq_test::IqTestView;
pub use result::ResultView;
pub use run_status::RunStatus;
pub use state::{ViewState, view_state_from_resource};
pub use trial::{MixedView, StroopView};

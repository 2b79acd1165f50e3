#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod iq_loop;
pub mod outcome;
pub mod result_cache;
pub mod trial_loop;

pub use api::{ApiClient, ApiRequest, HttpTransport, JsonTransport, Method};
pub use app_services::AppServices;
pub use config::{ApiConfig, RunLoopConfig, StroopPalette, Viewport};
pub use dashboard::{DashboardData, DashboardService};
pub use error::{AppServicesError, ConfigError, TransportError};
pub use iq_loop::{IqIntent, IqRunLoop, IqView};
pub use outcome::RunOutcome;
pub use result_cache::ResultCache;
pub use trial_loop::{TrialIntent, TrialRunLoop, TrialView};

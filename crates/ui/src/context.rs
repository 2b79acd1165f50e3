use std::sync::Arc;

use cogtest_core::layout::is_compact_height;
use cogtest_core::trial::BatteryKind;
use services::{
    AppServices, DashboardService, IqRunLoop, ResultCache, RunLoopConfig, TrialRunLoop,
};

pub trait UiApp: Send + Sync {
    fn run_config(&self) -> RunLoopConfig;

    fn dashboard(&self) -> DashboardService;
    fn result_cache(&self) -> ResultCache;
    fn iq_loop(&self) -> IqRunLoop;
    fn trial_loop(&self, kind: BatteryKind) -> TrialRunLoop;
}

impl UiApp for AppServices {
    fn run_config(&self) -> RunLoopConfig {
        self.config().clone()
    }

    fn dashboard(&self) -> DashboardService {
        AppServices::dashboard(self)
    }

    fn result_cache(&self) -> ResultCache {
        AppServices::result_cache(self)
    }

    fn iq_loop(&self) -> IqRunLoop {
        AppServices::iq_loop(self)
    }

    fn trial_loop(&self, kind: BatteryKind) -> TrialRunLoop {
        AppServices::trial_loop(self, kind)
    }
}

#[derive(Clone)]
pub struct AppContext {
    app: Arc<dyn UiApp>,
    config: RunLoopConfig,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        let config = app.run_config();
        Self {
            app: Arc::clone(app),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &RunLoopConfig {
        &self.config
    }

    /// Whether the test pages should use their compact layout.
    #[must_use]
    pub fn compact(&self) -> bool {
        is_compact_height(self.config.viewport.height)
    }

    #[must_use]
    pub fn dashboard(&self) -> DashboardService {
        self.app.dashboard()
    }

    #[must_use]
    pub fn result_cache(&self) -> ResultCache {
        self.app.result_cache()
    }

    #[must_use]
    pub fn iq_loop(&self) -> IqRunLoop {
        self.app.iq_loop()
    }

    #[must_use]
    pub fn trial_loop(&self, kind: BatteryKind) -> TrialRunLoop {
        self.app.trial_loop(kind)
    }
}

// Provided by the composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}

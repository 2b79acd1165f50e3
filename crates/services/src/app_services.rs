use std::sync::Arc;

use cogtest_core::trial::BatteryKind;
use storage::repository::Storage;

use crate::api::{ApiClient, JsonTransport};
use crate::config::{ApiConfig, RunLoopConfig};
use crate::dashboard::DashboardService;
use crate::error::AppServicesError;
use crate::iq_loop::IqRunLoop;
use crate::result_cache::ResultCache;
use crate::trial_loop::TrialRunLoop;

/// Assembles the app-facing services over one API client and one store.
#[derive(Clone)]
pub struct AppServices {
    api: ApiClient,
    cache: ResultCache,
    config: RunLoopConfig,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or HTTP client
    /// setup fails.
    pub async fn new_sqlite(
        db_url: &str,
        api_config: ApiConfig,
        config: RunLoopConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let api = ApiClient::http(api_config)?;
        Ok(Self::from_parts(api, &storage, config))
    }

    /// Build services over an arbitrary transport and in-memory storage.
    #[must_use]
    pub fn in_memory(transport: Arc<dyn JsonTransport>, config: RunLoopConfig) -> Self {
        Self::from_parts(ApiClient::new(transport), &Storage::in_memory(), config)
    }

    #[must_use]
    pub fn from_parts(api: ApiClient, storage: &Storage, config: RunLoopConfig) -> Self {
        let cache = ResultCache::new(Arc::clone(&storage.local_state));
        Self { api, cache, config }
    }

    #[must_use]
    pub fn config(&self) -> &RunLoopConfig {
        &self.config
    }

    #[must_use]
    pub fn result_cache(&self) -> ResultCache {
        self.cache.clone()
    }

    #[must_use]
    pub fn dashboard(&self) -> DashboardService {
        DashboardService::new(self.api.clone())
    }

    #[must_use]
    pub fn iq_loop(&self) -> IqRunLoop {
        IqRunLoop::new(self.api.clone(), self.cache.clone(), self.config.clone())
    }

    #[must_use]
    pub fn trial_loop(&self, kind: BatteryKind) -> TrialRunLoop {
        TrialRunLoop::new(self.api.clone(), self.config.clone(), kind)
    }
}

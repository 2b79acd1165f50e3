use cogtest_core::model::{AnalyticsSummary, ChartSeries, TestCatalog, TestInfo};

use crate::api::{ApiClient, ApiRequest, paths};

/// Everything the home and analytics pages paint. Each part is optional on
/// its own; a failing endpoint only blanks its own widget.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardData {
    pub tests: Vec<TestInfo>,
    pub summary: Option<AnalyticsSummary>,
    pub funnel: Option<ChartSeries>,
    pub profiles: Option<ChartSeries>,
    pub dropoff: Option<ChartSeries>,
}

#[derive(Clone)]
pub struct DashboardService {
    api: ApiClient,
}

impl DashboardService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch the catalog and every analytics series concurrently.
    pub async fn load(&self) -> DashboardData {
        let (catalog, summary, funnel, profiles, dropoff) = tokio::join!(
            self.api
                .fetch_json::<TestCatalog>(ApiRequest::get(paths::TESTS)),
            self.api
                .fetch_json::<AnalyticsSummary>(ApiRequest::get(paths::ANALYTICS_SUMMARY)),
            self.api
                .fetch_json::<ChartSeries>(ApiRequest::get(paths::ANALYTICS_FUNNEL)),
            self.api
                .fetch_json::<ChartSeries>(ApiRequest::get(paths::ANALYTICS_PROFILES)),
            self.api
                .fetch_json::<ChartSeries>(ApiRequest::get(paths::ANALYTICS_DROPOFF)),
        );

        DashboardData {
            tests: catalog.map(|catalog| catalog.tests).unwrap_or_default(),
            summary,
            funnel,
            profiles,
            dropoff,
        }
    }
}

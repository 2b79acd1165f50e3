mod analytics;
mod answer;
mod ids;
mod item;
mod result;
mod trial;

pub use analytics::{AnalyticsSummary, ChartSeries, TestCatalog, TestInfo};
pub use answer::Answer;
pub use ids::{ItemId, SessionId};
pub use item::{Item, ItemOption, Pattern, Visual};
pub use result::{MixedScore, StroopScore, TestResult};
pub use trial::{MixedBody, MixedItem, StroopTrial};

use cogtest_core::model::TestResult;

use super::time_fmt::MISSING;

pub const NO_RESULT_LABEL: &str = "Complete the test to see your result.";

const SCALE_FLOOR: f64 = 80.0;
const SCALE_SPAN: f64 = 70.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ResultVm {
    pub iq: String,
    pub label: String,
    pub score: String,
    /// Horizontal marker position on the 80..150 scale, in percent.
    pub marker_pct: f64,
}

/// Marker position for an IQ value, clamped to the visible scale.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn marker_position(iq: i64) -> f64 {
    ((iq as f64 - SCALE_FLOOR) / SCALE_SPAN * 100.0).clamp(0.0, 100.0)
}

#[must_use]
pub fn map_result(result: Option<&TestResult>) -> ResultVm {
    match result {
        None => ResultVm {
            iq: format!("IQ estimate: {MISSING}"),
            label: NO_RESULT_LABEL.to_owned(),
            score: format!("Score: {MISSING}"),
            marker_pct: 0.0,
        },
        Some(result) => ResultVm {
            iq: format!("IQ estimate: {}", result.iq),
            label: result.label.clone(),
            score: format!("Score: {}", result.score),
            marker_pct: marker_position(result.iq),
        },
    }
}

mod dashboard_vm;
mod question_vm;
mod result_vm;
mod time_fmt;
mod trial_vm;

pub use dashboard_vm::{
    BarVm, ChartVm, HeroVm, NO_TESTS, SummaryVm, TestRowVm, map_dropoff, map_funnel, map_hero,
    map_profiles, map_summary, map_test_rows,
};
pub use question_vm::{IqPageVm, OptionVm, PatternVm, QuestionCardVm, map_iq_page};
pub use result_vm::{ResultVm, map_result, marker_position};
pub use time_fmt::{MISSING, format_time};
pub use trial_vm::{
    ChoiceVm, RULE_HINT, StimulusVm, TrialPageVm, TrialSummaryVm, feedback_label, map_trial_page,
    map_trial_summary,
};

use cogtest_core::model::MixedBody;
use cogtest_core::trial::{BatteryKind, TrialSession, TrialStimulus, TrialSummary};
use services::StroopPalette;

pub const RULE_HINT: &str = "Pick the correct colour according to the active rule.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceVm {
    pub value: String,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StimulusVm {
    /// A colour word drawn in a (possibly conflicting) ink.
    Word { word: String, color: String },
    Question { prompt: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrialPageVm {
    pub progress: String,
    pub hint: Option<&'static str>,
    pub stimulus: StimulusVm,
    pub choices: Vec<ChoiceVm>,
}

fn palette_choices(palette: &StroopPalette) -> Vec<ChoiceVm> {
    palette
        .colors()
        .iter()
        .map(|color| ChoiceVm {
            value: color.name.clone(),
            label: color.name.to_uppercase(),
        })
        .collect()
}

#[must_use]
pub fn map_trial_page(session: &TrialSession, palette: &StroopPalette) -> TrialPageVm {
    let progress = match session.kind() {
        BatteryKind::Stroop => format!("Trial {}", session.trial_index()),
        BatteryKind::Mixed => match session.total() {
            Some(total) => format!("Item {} / {total}", session.answered() + 1),
            None => format!("Item {}", session.answered() + 1),
        },
    };
    let hint = (session.kind() == BatteryKind::Stroop).then_some(RULE_HINT);

    let (stimulus, choices) = match session.current() {
        TrialStimulus::Stroop(trial) => (
            StimulusVm::Word {
                word: trial.word.clone(),
                color: palette.ink(&trial.ink),
            },
            palette_choices(palette),
        ),
        TrialStimulus::Mixed(item) => match &item.body {
            MixedBody::Stroop { word, ink } => (
                StimulusVm::Word {
                    word: word.clone(),
                    color: palette.ink(ink),
                },
                palette_choices(palette),
            ),
            MixedBody::Iq { prompt, options } => (
                StimulusVm::Question {
                    prompt: prompt.clone(),
                },
                options
                    .iter()
                    .map(|option| ChoiceVm {
                        value: option.value().to_owned(),
                        label: option.label().to_owned(),
                    })
                    .collect(),
            ),
        },
    };

    TrialPageVm {
        progress,
        hint,
        stimulus,
        choices,
    }
}

#[must_use]
pub fn feedback_label(correct: Option<bool>) -> &'static str {
    match correct {
        None => "In progress",
        Some(true) => "✅ Correct",
        Some(false) => "❌ Incorrect",
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrialSummaryVm {
    pub headline: String,
    pub detail: Option<String>,
}

#[must_use]
pub fn map_trial_summary(summary: &TrialSummary) -> TrialSummaryVm {
    match summary {
        TrialSummary::Stroop(score) => TrialSummaryVm {
            headline: format!("Score: {}", score.score),
            detail: (!score.profile.is_empty()).then(|| score.profile.clone()),
        },
        TrialSummary::Mixed(score) => TrialSummaryVm {
            headline: format!(
                "Combined score: {} (IQ {}%, Stroop {}%)",
                score.score, score.iq_pct, score.stroop_pct
            ),
            detail: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cogtest_core::model::{MixedScore, StroopScore};
    use serde_json::json;

    use super::*;

    #[test]
    fn stroop_page_colours_the_word_with_its_ink() {
        let session = TrialSession::from_start(
            BatteryKind::Stroop,
            &json!({"session_id": "s", "trial": {"word": "ROJO", "ink": "azul"}}),
            16,
        )
        .unwrap();
        let page = map_trial_page(&session, &StroopPalette::default());

        assert_eq!(page.progress, "Trial 1");
        assert_eq!(page.hint, Some(RULE_HINT));
        assert_eq!(
            page.stimulus,
            StimulusVm::Word {
                word: "ROJO".into(),
                color: "#3b82f6".into()
            }
        );
        let labels: Vec<&str> = page.choices.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["ROJO", "VERDE", "AZUL", "AMARILLO"]);
        assert_eq!(page.choices[2].value, "azul");
    }

    #[test]
    fn mixed_page_counts_answered_items() {
        let mut session = TrialSession::from_start(
            BatteryKind::Mixed,
            &json!({
                "session_id": "m",
                "item": {"item_id": "Q1", "kind": "iq", "payload": {"prompt": "2, 4, 8, ?", "options": ["12", "16"]}}
            }),
            16,
        )
        .unwrap();
        let page = map_trial_page(&session, &StroopPalette::default());
        assert_eq!(page.progress, "Item 1 / 16");
        assert_eq!(page.hint, None);
        assert_eq!(
            page.stimulus,
            StimulusVm::Question {
                prompt: "2, 4, 8, ?".into()
            }
        );
        assert_eq!(page.choices.len(), 2);

        session.respond("16", Duration::from_millis(900)).unwrap();
        session.apply_feedback(&json!({
            "item": {"item_id": "S1", "kind": "stroop", "payload": {"word": "VERDE", "ink": "magenta"}}
        }));
        session.show_next();
        let page = map_trial_page(&session, &StroopPalette::default());
        assert_eq!(page.progress, "Item 2 / 16");
        assert_eq!(
            page.stimulus,
            StimulusVm::Word {
                word: "VERDE".into(),
                color: "magenta".into()
            }
        );
        assert_eq!(page.choices.len(), 4);
    }

    #[test]
    fn feedback_and_summary_labels() {
        assert_eq!(feedback_label(None), "In progress");
        assert_eq!(feedback_label(Some(true)), "✅ Correct");
        assert_eq!(feedback_label(Some(false)), "❌ Incorrect");

        let stroop = map_trial_summary(&TrialSummary::Stroop(StroopScore {
            score: 0.8,
            profile: "Flexible".into(),
        }));
        assert_eq!(stroop.headline, "Score: 0.8");
        assert_eq!(stroop.detail.as_deref(), Some("Flexible"));

        let mixed = map_trial_summary(&TrialSummary::Mixed(MixedScore {
            score: 71.5,
            iq_pct: 80.0,
            stroop_pct: 63.0,
        }));
        assert_eq!(mixed.headline, "Combined score: 71.5 (IQ 80%, Stroop 63%)");
    }
}

use cogtest_core::model::{ItemOption, Pattern};
use cogtest_core::session::{AdvancePolicy, IqSession, ItemSlot};

/// How an option (or a question's base visual) is drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatternVm {
    Image { src: String, alt: String },
    Text(String),
}

fn map_pattern(pattern: &Pattern) -> PatternVm {
    match pattern {
        Pattern::Image { src, alt } => PatternVm::Image {
            src: src.clone(),
            alt: alt.clone().unwrap_or_default(),
        },
        other => PatternVm::Text(other.text().unwrap_or_default()),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub value: String,
    pub label: String,
    pub visual: Option<PatternVm>,
    pub active: bool,
    pub disabled: bool,
}

fn map_option(option: &ItemOption, slot: &ItemSlot) -> OptionVm {
    // An explicit image wins over a pattern; plain labels are the fallback.
    let visual = match option.image() {
        Some(src) => Some(PatternVm::Image {
            src: src.to_owned(),
            alt: option.label().to_owned(),
        }),
        None => option.pattern().map(map_pattern),
    };
    let chosen = slot
        .answer()
        .and_then(|answer| answer.answer.as_deref())
        .or(slot.pending());
    OptionVm {
        value: option.value().to_owned(),
        label: option.label().to_owned(),
        visual,
        active: chosen == Some(option.value()),
        disabled: slot.is_resolved(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionCardVm {
    pub item_id: String,
    pub number: u32,
    pub prompt: String,
    pub base_visual: Option<PatternVm>,
    pub options: Vec<OptionVm>,
    pub timer: String,
    pub resolved: bool,
    pub timed_out: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IqPageVm {
    pub progress: String,
    pub timer: String,
    pub cards: Vec<QuestionCardVm>,
    pub show_advance: bool,
    pub can_advance: bool,
}

/// Maps the session's on-screen block into page view data.
#[must_use]
pub fn map_iq_page(session: &IqSession) -> IqPageVm {
    let first = session.first_displayed_number();
    let cards: Vec<QuestionCardVm> = session
        .displayed()
        .iter()
        .zip(first..)
        .map(|(slot, number)| {
            let item = slot.item();
            QuestionCardVm {
                item_id: item.item_id().to_string(),
                number,
                prompt: item.prompt().to_owned(),
                base_visual: item.base_visual().map(map_pattern),
                options: item
                    .options()
                    .iter()
                    .map(|option| map_option(option, slot))
                    .collect(),
                timer: format!("{}s", slot.remaining()),
                resolved: slot.is_resolved(),
                timed_out: slot.answer().is_some_and(|answer| answer.timed_out),
            }
        })
        .collect();

    let remaining = session
        .displayed()
        .iter()
        .filter(|slot| slot.timer_running())
        .map(ItemSlot::remaining)
        .max()
        .unwrap_or(0);

    IqPageVm {
        progress: format!("Question {first} / {}", session.total()),
        timer: format!("Time left: {remaining}s"),
        cards,
        show_advance: session.policy() == AdvancePolicy::ManualGate,
        can_advance: session.can_advance(),
    }
}

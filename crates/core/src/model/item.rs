use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::ItemId;

/// Visual payload attached to an option or a question.
///
/// Backends send either an image reference, a list of text rows (ASCII-art
/// matrices), or a single text block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Pattern {
    Image {
        src: String,
        #[serde(default)]
        alt: Option<String>,
    },
    Lines(Vec<String>),
    Text(String),
}

impl Pattern {
    /// Text rendering of a non-image pattern, one row per line.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        match self {
            Pattern::Image { .. } => None,
            Pattern::Lines(lines) => Some(lines.join("\n")),
            Pattern::Text(text) => Some(text.clone()),
        }
    }
}

/// Question-level visual (`visual.base` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Visual {
    #[serde(default)]
    pub base: Option<Pattern>,
}

/// One selectable option of an item.
///
/// `value` is what gets submitted, `label` is what gets shown.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawOption")]
pub struct ItemOption {
    value: String,
    label: String,
    pattern: Option<Pattern>,
    image: Option<String>,
}

impl ItemOption {
    /// Plain text option whose label equals its value.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
            pattern: None,
            image: None,
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn pattern(&self) -> Option<&Pattern> {
        self.pattern.as_ref()
    }

    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOption {
    Text(String),
    Object(Map<String, Value>),
    Scalar(Value),
}

fn present<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|value| !value.is_null())
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl From<RawOption> for ItemOption {
    fn from(raw: RawOption) -> Self {
        match raw {
            RawOption::Text(text) => Self::text(text),
            RawOption::Scalar(value) => Self::text(scalar_text(&value)),
            RawOption::Object(map) => {
                let value = present(&map, "value")
                    .or_else(|| present(&map, "label"))
                    .map_or_else(|| Value::Object(map.clone()).to_string(), scalar_text);
                let label = present(&map, "label")
                    .or_else(|| present(&map, "value"))
                    .map(scalar_text)
                    .unwrap_or_default();
                let pattern = present(&map, "pattern")
                    .and_then(|raw| serde_json::from_value(raw.clone()).ok());
                let image = present(&map, "image")
                    .and_then(Value::as_str)
                    .map(str::to_owned);
                Self {
                    value,
                    label,
                    pattern,
                    image,
                }
            }
        }
    }
}

/// A single test item delivered inside a block. Immutable once received.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Item {
    item_id: ItemId,
    #[serde(default)]
    prompt: String,
    #[serde(default)]
    options: Vec<ItemOption>,
    #[serde(default)]
    time_limit: u32,
    #[serde(default)]
    visual: Option<Visual>,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    difficulty: Option<u32>,
}

impl Item {
    /// Build a text-only item.
    #[must_use]
    pub fn text(
        item_id: impl Into<String>,
        prompt: impl Into<String>,
        options: &[&str],
        time_limit: u32,
    ) -> Self {
        Self {
            item_id: ItemId::new(item_id),
            prompt: prompt.into(),
            options: options.iter().map(|opt| ItemOption::text(*opt)).collect(),
            time_limit,
            visual: None,
            domain: None,
            difficulty: None,
        }
    }

    #[must_use]
    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[ItemOption] {
        &self.options
    }

    /// Allotted time in whole seconds.
    #[must_use]
    pub fn time_limit(&self) -> u32 {
        self.time_limit
    }

    /// The question-level visual, if it carries a base pattern.
    #[must_use]
    pub fn base_visual(&self) -> Option<&Pattern> {
        self.visual.as_ref().and_then(|visual| visual.base.as_ref())
    }

    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    #[must_use]
    pub fn difficulty(&self) -> Option<u32> {
        self.difficulty
    }

    /// Whether `value` is one of this item's submittable option values.
    #[must_use]
    pub fn accepts(&self, value: &str) -> bool {
        self.options.iter().any(|opt| opt.value == value)
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{ItemId, ItemOption};

/// One Stroop stimulus: a colour word printed in some ink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StroopTrial {
    pub word: String,
    pub ink: String,
    #[serde(default)]
    pub trial_type: Option<String>,
    #[serde(default)]
    pub rule_id: Option<String>,
}

/// Payload of a mixed-battery item, selected by its `kind` tag.
#[derive(Debug, Clone, PartialEq)]
pub enum MixedBody {
    Iq {
        prompt: String,
        options: Vec<ItemOption>,
    },
    Stroop {
        word: String,
        ink: String,
    },
}

/// One step of the combined IQ + Stroop battery.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawMixedItem")]
pub struct MixedItem {
    pub item_id: ItemId,
    pub body: MixedBody,
}

#[derive(Deserialize)]
struct RawMixedItem {
    #[serde(default)]
    item_id: Option<String>,
    #[serde(default)]
    kind: String,
    #[serde(default)]
    payload: Value,
}

fn text_field(payload: &Value, key: &str) -> String {
    payload
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

impl From<RawMixedItem> for MixedItem {
    fn from(raw: RawMixedItem) -> Self {
        // Anything that is not an IQ item is rendered as a Stroop stimulus.
        let body = if raw.kind == "iq" {
            let options = raw
                .payload
                .get("options")
                .cloned()
                .and_then(|opts| serde_json::from_value::<Vec<ItemOption>>(opts).ok())
                .unwrap_or_default();
            MixedBody::Iq {
                prompt: text_field(&raw.payload, "prompt"),
                options,
            }
        } else {
            MixedBody::Stroop {
                word: text_field(&raw.payload, "word"),
                ink: text_field(&raw.payload, "ink"),
            }
        };
        Self {
            item_id: ItemId::new(raw.item_id.unwrap_or_default()),
            body,
        }
    }
}

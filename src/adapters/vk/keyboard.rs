//! VK keyboard JSON rendered from a [`ChoiceMenu`].

use serde::Serialize;

use crate::domain::dialog::{ChoiceMenu, ChoiceTone};

#[derive(Debug, Serialize)]
pub(super) struct Keyboard {
    one_time: bool,
    buttons: Vec<Vec<Button>>,
}

#[derive(Debug, Serialize)]
struct Button {
    color: &'static str,
    action: Action,
}

#[derive(Debug, Serialize)]
struct Action {
    #[serde(rename = "type")]
    kind: &'static str,
    label: String,
    payload: String,
}

// VK rejects labels longer than 40 characters.
const MAX_LABEL_CHARS: usize = 40;

fn color(tone: ChoiceTone) -> &'static str {
    match tone {
        ChoiceTone::Primary => "primary",
        ChoiceTone::Secondary => "secondary",
        ChoiceTone::Positive => "positive",
        ChoiceTone::Negative => "negative",
    }
}

impl Keyboard {
    pub(super) fn from_menu(menu: &ChoiceMenu) -> Self {
        let buttons = menu
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|choice| Button {
                        color: color(choice.tone),
                        action: Action {
                            kind: "text",
                            label: choice.label.chars().take(MAX_LABEL_CHARS).collect(),
                            payload: choice.command.encode(),
                        },
                    })
                    .collect()
            })
            .collect();

        Self {
            one_time: menu.one_time,
            buttons,
        }
    }

    pub(super) fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

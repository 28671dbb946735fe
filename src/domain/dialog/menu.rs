//! Choice menus attached to outbound messages.

use serde::{Deserialize, Serialize};

use super::Command;

/// Visual emphasis of a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceTone {
    #[default]
    Primary,
    Secondary,
    Positive,
    Negative,
}

/// One button: a label and the command it sends back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    pub command: Command,
    pub tone: ChoiceTone,
}

impl Choice {
    pub fn new(label: impl Into<String>, command: Command) -> Self {
        Self {
            label: label.into(),
            command,
            tone: ChoiceTone::Primary,
        }
    }

    pub fn with_tone(mut self, tone: ChoiceTone) -> Self {
        self.tone = tone;
        self
    }
}

/// A grid of choices rendered under a message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChoiceMenu {
    pub rows: Vec<Vec<Choice>>,
    pub one_time: bool,
}

impl ChoiceMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, row: Vec<Choice>) -> Self {
        if !row.is_empty() {
            self.rows.push(row);
        }
        self
    }

    /// Lays `choices` out `columns` per row.
    pub fn grid(mut self, choices: Vec<Choice>, columns: usize) -> Self {
        let columns = columns.max(1);
        let mut row = Vec::with_capacity(columns);
        for choice in choices {
            row.push(choice);
            if row.len() == columns {
                self.rows.push(std::mem::take(&mut row));
            }
        }
        self.row(row)
    }

    pub fn one_time(mut self) -> Self {
        self.one_time = true;
        self
    }

    /// All choices in reading order.
    pub fn choices(&self) -> impl Iterator<Item = &Choice> {
        self.rows.iter().flatten()
    }

    /// Looks a choice up by its label.
    pub fn find(&self, label: &str) -> Option<&Choice> {
        self.choices().find(|c| c.label == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_wraps_rows() {
        let choices = (0..5)
            .map(|i| Choice::new(format!("c{}", i), Command::Menu))
            .collect();
        let menu = ChoiceMenu::new().grid(choices, 2);

        assert_eq!(menu.rows.len(), 3);
        assert_eq!(menu.rows[2].len(), 1);
    }

    #[test]
    fn empty_rows_are_skipped() {
        let menu = ChoiceMenu::new().row(vec![]).row(vec![Choice::new("a", Command::Back)]);
        assert_eq!(menu.rows.len(), 1);
        assert_eq!(menu.find("a").map(|c| &c.command), Some(&Command::Back));
    }
}

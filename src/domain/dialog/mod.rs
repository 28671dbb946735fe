//! Dialog module - typed commands, choice menus and resumable dialog state.

mod command;
mod menu;
mod state;

pub use command::{Command, MalformedCommand};
pub use menu::{Choice, ChoiceMenu, ChoiceTone};
pub use state::{dialog_key, DialogState, TasksDialog};

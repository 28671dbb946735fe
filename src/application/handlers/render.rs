//! Texts and choice menus shown by the conversation flows.

use chrono::NaiveDate;

use crate::domain::dialog::{Choice, ChoiceMenu, ChoiceTone, Command};
use crate::domain::goals::{Goal, GoalStatus, GoalType, UserGoal};

use crate::application::PlannedGoal;

pub const REGISTER_PROMPT: &str = "Are you ready?";
pub const MAIN_MENU: &str = "Main menu";
pub const TASKS_MENU: &str = "Tasks";
pub const NOTHING_PLANNED: &str = "You have not planned anything for this day";
pub const CHOOSE_DATE: &str = "Choose a date";
pub const CHOOSE_TYPE: &str = "Choose a category";
pub const CHOOSE_GOAL: &str = "Choose a goal";
pub const TYPE_GOAL: &str = "Type your goal";
pub const MARK_COMPLETED: &str = "Mark the completed goals";
pub const NOTHING_TO_RATE: &str = "You have rated everything for now";
pub const MORNING_GREETING: &str = "Good morning! Here is your plan for today";
pub const EVENING_GREETING: &str = "Good evening! Update the status of your goals";
pub const PLAN_TOMORROW: &str = "Don't forget to plan tomorrow";

pub fn status_label(status: GoalStatus) -> &'static str {
    match status {
        GoalStatus::Soon => "Planned",
        GoalStatus::InProgress => "In progress",
        GoalStatus::Complete => "Done",
        GoalStatus::Failed => "Failed",
    }
}

fn back() -> Choice {
    Choice::new("Back", Command::Back).with_tone(ChoiceTone::Secondary)
}

fn to_menu() -> Choice {
    Choice::new("Menu", Command::Menu).with_tone(ChoiceTone::Secondary)
}

fn planned_for<'a>(plan: &'a [PlannedGoal], goal_type: &GoalType) -> Option<&'a PlannedGoal> {
    plan.iter().find(|p| p.binding.goal_type == goal_type.id)
}

fn description(planned: &PlannedGoal) -> &str {
    planned.goal.as_ref().map(|g| g.description.as_str()).unwrap_or("?")
}

pub fn register_menu() -> ChoiceMenu {
    ChoiceMenu::new()
        .row(vec![Choice::new("Ready", Command::Register).with_tone(ChoiceTone::Positive)])
        .one_time()
}

pub fn main_menu() -> ChoiceMenu {
    ChoiceMenu::new().row(vec![
        Choice::new("Tasks", Command::ToTasks),
        Choice::new("Rate", Command::ToRate),
    ])
}

pub fn tasks_menu() -> ChoiceMenu {
    ChoiceMenu::new()
        .row(vec![
            Choice::new("Today", Command::CurrentTasks),
            Choice::new("Mark done", Command::UpdateTask),
        ])
        .row(vec![
            Choice::new("Plans", Command::ObserveTasks),
            Choice::new("Change plan", Command::ChangeTask),
        ])
        .row(vec![to_menu()])
}

/// Every category with its planned goal, or a "not planned" line.
pub fn day_plan(types: &[GoalType], plan: &[PlannedGoal]) -> String {
    let mut text = String::new();
    for goal_type in types {
        match planned_for(plan, goal_type) {
            Some(planned) => {
                text.push_str(&format!("{}\n 💡 {}\n\n", goal_type.name, description(planned)))
            }
            None => text.push_str(&format!("{}\n 📍 Not planned\n\n", goal_type.name)),
        }
    }
    text
}

/// Planned goals with their status. `None` when nothing is planned.
pub fn marked_plan(types: &[GoalType], plan: &[PlannedGoal]) -> Option<String> {
    let mut text = String::new();
    for goal_type in types {
        if let Some(planned) = planned_for(plan, goal_type) {
            let status = planned.binding.status;
            text.push_str(&format!(
                "{}\n 💡 {}\nStatus - {} {}\n\n",
                goal_type.name,
                description(planned),
                status.mark(),
                status_label(status)
            ));
        }
    }
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

pub fn current_goal(goal: &Goal) -> String {
    format!("Current goal\n - {}", goal.description)
}

pub fn date_label(date: NaiveDate) -> String {
    date.format("%-d %B").to_string()
}

/// Dates three per row; fully planned dates are highlighted.
pub fn date_menu(dates: &[(NaiveDate, bool)], command: impl Fn(NaiveDate) -> Command) -> ChoiceMenu {
    let choices = dates
        .iter()
        .map(|&(date, planned)| {
            let choice = Choice::new(date_label(date), command(date));
            if planned {
                choice.with_tone(ChoiceTone::Positive)
            } else {
                choice
            }
        })
        .collect();
    ChoiceMenu::new().grid(choices, 3).row(vec![back()])
}

/// Categories to toggle; completed ones are highlighted.
pub fn mark_menu(types: &[GoalType], today: &[UserGoal]) -> ChoiceMenu {
    let choices = types
        .iter()
        .map(|t| {
            let choice = Choice::new(t.name.clone(), Command::UpdateType { goal_type: t.id });
            let complete = today
                .iter()
                .any(|b| b.goal_type == t.id && b.status == GoalStatus::Complete);
            if complete {
                choice.with_tone(ChoiceTone::Positive)
            } else {
                choice
            }
        })
        .collect();
    ChoiceMenu::new().grid(choices, 2).row(vec![back()])
}

/// Categories to plan on `date`; planned ones are highlighted.
pub fn type_menu(types: &[GoalType], date: NaiveDate, planned: &[UserGoal]) -> ChoiceMenu {
    let choices = types
        .iter()
        .map(|t| {
            let choice = Choice::new(
                t.name.clone(),
                Command::ChangeType {
                    goal_type: t.id,
                    date,
                },
            );
            if planned.iter().any(|b| b.goal_type == t.id) {
                choice.with_tone(ChoiceTone::Positive)
            } else {
                choice
            }
        })
        .collect();
    ChoiceMenu::new().grid(choices, 2).row(vec![back()]).one_time()
}

pub fn goal_menu(goals: &[Goal]) -> ChoiceMenu {
    let choices = goals
        .iter()
        .map(|g| Choice::new(g.description.clone(), Command::ChoseGoal { goal: g.id }))
        .collect();
    ChoiceMenu::new().grid(choices, 2).row(vec![back()])
}

pub fn review_menu(user_goal: &UserGoal) -> ChoiceMenu {
    ChoiceMenu::new()
        .row(vec![
            Choice::new("👍🏻", Command::Approve { user_goal: user_goal.id })
                .with_tone(ChoiceTone::Positive),
            Choice::new("👎🏻", Command::Disapprove { user_goal: user_goal.id })
                .with_tone(ChoiceTone::Negative),
        ])
        .row(vec![to_menu()])
        .one_time()
}

pub fn rated_all_menu() -> ChoiceMenu {
    ChoiceMenu::new().row(vec![to_menu()]).one_time()
}

pub fn disapproval(date: NaiveDate, goal: &Goal) -> String {
    format!(
        "Your goal was marked as invalid\nDate\n ⏱ - {}\nTask\n 💡 - {}",
        date.format("%B %-d"),
        goal.description
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DayWindow, GoalId, GoalTypeId, Timezone, UserGoalId, UserId};
    use crate::domain::goals::Phase;

    fn category(id: i64, name: &str) -> GoalType {
        GoalType {
            id: GoalTypeId::new(id),
            name: name.to_string(),
            points: 1,
            evaluated: false,
            from_list: false,
        }
    }

    fn planned(goal_type: i64, status: GoalStatus, text: &str) -> PlannedGoal {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        PlannedGoal {
            binding: UserGoal {
                id: UserGoalId::new(goal_type),
                user_id: UserId::new(1),
                goal_id: GoalId::new(goal_type),
                goal_type: GoalTypeId::new(goal_type),
                phase: Phase::Active,
                status,
                window: DayWindow::for_date(date, Timezone::default()),
            },
            goal: Some(Goal {
                id: GoalId::new(goal_type),
                goal_type: GoalTypeId::new(goal_type),
                description: text.to_string(),
            }),
        }
    }

    #[test]
    fn day_plan_lists_unplanned_categories() {
        let types = [category(1, "Wake up"), category(2, "Sport")];
        let text = day_plan(&types, &[planned(1, GoalStatus::Soon, "at 7")]);

        assert!(text.contains("Wake up\n 💡 at 7"));
        assert!(text.contains("Sport\n 📍 Not planned"));
    }

    #[test]
    fn marked_plan_skips_unplanned_and_is_none_when_empty() {
        let types = [category(1, "Wake up"), category(2, "Sport")];
        let text = marked_plan(&types, &[planned(2, GoalStatus::Complete, "run")]).unwrap();

        assert!(!text.contains("Wake up"));
        assert!(text.contains("Status - 🍏 Done"));
        assert_eq!(marked_plan(&types, &[]), None);
    }

    #[test]
    fn date_menu_highlights_planned_dates() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        let dates: Vec<_> = (2..8).map(|day| (d(day), day == 3)).collect();
        let menu = date_menu(&dates, |date| Command::ObserveDate { date });

        assert_eq!(menu.rows.len(), 3);
        assert_eq!(menu.find("3 March").map(|c| c.tone), Some(ChoiceTone::Positive));
        assert_eq!(menu.find("2 March").map(|c| c.tone), Some(ChoiceTone::Primary));
        assert_eq!(menu.find("Back").map(|c| &c.command), Some(&Command::Back));
    }

    #[test]
    fn mark_menu_highlights_completed_categories() {
        let types = [category(1, "Wake up"), category(2, "Sport")];
        let today = [planned(2, GoalStatus::Complete, "run").binding];
        let menu = mark_menu(&types, &today);

        assert_eq!(menu.find("Sport").map(|c| c.tone), Some(ChoiceTone::Positive));
        assert_eq!(menu.find("Wake up").map(|c| c.tone), Some(ChoiceTone::Primary));
    }
}

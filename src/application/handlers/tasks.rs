//! Tasks flow: today's plan, status marks and planning ahead.
//!
//! Planning a day is a short dialog: pick a date, pick a category, then pick
//! a catalog goal or type one. The pending date and category live in the
//! peer's [`TasksDialog`] between turns.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

use crate::domain::dialog::{Command, DialogState, TasksDialog};
use crate::domain::foundation::{local_date_of, DayWindow, DomainError, GoalId, GoalTypeId, Timestamp};
use crate::domain::goals::{GoalChoice, NewGoal};
use crate::domain::users::{FlowName, User};
use crate::ports::{Clock, InboundMessage, Transport};

use crate::application::{DialogStore, GoalAssignmentManager, GoalCatalog, UserDirectory};

use super::{render, ConversationError, FlowHandler};

/// Days offered by the date chooser, starting tomorrow.
pub const PLANNING_HORIZON_DAYS: u64 = 6;

pub struct TasksFlow {
    directory: Arc<UserDirectory>,
    assignments: Arc<GoalAssignmentManager>,
    catalog: Arc<GoalCatalog>,
    dialogs: Arc<DialogStore>,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
}

impl TasksFlow {
    pub fn new(
        directory: Arc<UserDirectory>,
        assignments: Arc<GoalAssignmentManager>,
        catalog: Arc<GoalCatalog>,
        dialogs: Arc<DialogStore>,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            directory,
            assignments,
            catalog,
            dialogs,
            transport,
            clock,
        }
    }

    /// Sends the tasks menu.
    pub async fn send_main(&self, user: &User) -> Result<(), DomainError> {
        self.transport
            .send(user.id, render::TASKS_MENU, Some(&render::tasks_menu()))
            .await
    }

    /// Sends every category of the day with its planned goal.
    pub async fn send_day_plan(&self, user: &User, instant: Timestamp) -> Result<(), DomainError> {
        let types = self.catalog.goal_types().await?;
        let plan = self.assignments.day_plan(user, instant).await?;
        self.transport
            .send(user.id, &render::day_plan(&types, &plan), None)
            .await
    }

    /// Sends the planned goals of the day with their status marks.
    ///
    /// Returns `false` without sending when nothing is planned.
    pub async fn send_marked_plan(&self, user: &User, instant: Timestamp) -> Result<bool, DomainError> {
        let types = self.catalog.goal_types().await?;
        let plan = self.assignments.day_plan(user, instant).await?;
        match render::marked_plan(&types, &plan) {
            Some(text) => {
                self.transport.send(user.id, &text, None).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn send_mark_menu(&self, user: &User, instant: Timestamp) -> Result<(), DomainError> {
        let types = self.catalog.goal_types().await?;
        let today = self.assignments.user_goals(user, instant).await?;
        self.transport
            .send(user.id, render::MARK_COMPLETED, Some(&render::mark_menu(&types, &today)))
            .await
    }

    async fn send_date_menu(
        &self,
        user: &User,
        command: impl Fn(NaiveDate) -> Command + Send,
    ) -> Result<(), DomainError> {
        let today = local_date_of(self.clock.now(), user.timezone);
        let mut dates = Vec::new();
        for date in today.iter_days().skip(1).take(PLANNING_HORIZON_DAYS as usize) {
            let planned = self.assignments.check_date(user, day_start(user, date)).await?;
            dates.push((date, planned));
        }
        self.transport
            .send(user.id, render::CHOOSE_DATE, Some(&render::date_menu(&dates, command)))
            .await
    }

    async fn send_type_menu(&self, user: &User, date: NaiveDate) -> Result<(), DomainError> {
        let types = self.catalog.goal_types().await?;
        let planned = self.assignments.user_goals(user, day_start(user, date)).await?;
        self.transport
            .send(user.id, render::CHOOSE_TYPE, Some(&render::type_menu(&types, date, &planned)))
            .await
    }

    async fn today_status(&self, user: &User, now: Timestamp) -> Result<(), DomainError> {
        if self.send_marked_plan(user, now).await? {
            self.send_mark_menu(user, now).await
        } else {
            self.transport.send(user.id, render::NOTHING_PLANNED, None).await?;
            self.send_main(user).await
        }
    }

    async fn choose_type(
        &self,
        user: &User,
        state: &mut DialogState<TasksDialog>,
        goal_type: GoalTypeId,
        date: NaiveDate,
    ) -> Result<(), ConversationError> {
        let Some(category) = self.catalog.goal_type(goal_type).await? else {
            return Err(ConversationError::malformed(format!("unknown goal type {}", goal_type)));
        };

        if let Some(binding) = self
            .assignments
            .get_by_type(user, day_start(user, date), goal_type)
            .await?
        {
            if let Some(goal) = self.catalog.goal(binding.goal_id).await? {
                self.transport.send(user.id, &render::current_goal(&goal), None).await?;
            }
        }

        self.dialogs
            .set_params(state, TasksDialog::category_chosen(date, goal_type, category.from_list))
            .await?;

        if category.from_list {
            let goals = self.catalog.goals_of_type(goal_type).await?;
            self.transport
                .send(user.id, render::CHOOSE_GOAL, Some(&render::goal_menu(&goals)))
                .await?;
        } else {
            self.transport.send(user.id, render::TYPE_GOAL, None).await?;
        }
        Ok(())
    }

    /// Assigns the goal, shows the updated plan and starts over at the
    /// category chooser.
    async fn assign(
        &self,
        user: &User,
        state: &DialogState<TasksDialog>,
        date: NaiveDate,
        choice: GoalChoice,
    ) -> Result<(), ConversationError> {
        let instant = day_start(user, date);
        self.assignments.assign_goal(user, choice, instant).await?;
        self.send_day_plan(user, instant).await?;
        self.dialogs.clear(state).await?;
        self.send_type_menu(user, date).await?;
        Ok(())
    }

    async fn chose_goal(
        &self,
        user: &User,
        state: &DialogState<TasksDialog>,
        goal: GoalId,
    ) -> Result<(), ConversationError> {
        let Some((date, goal_type)) = state.params.pending() else {
            return Err(ConversationError::malformed("goal chosen with no category pending"));
        };
        let Some(goal) = self.catalog.goal(goal).await? else {
            return Err(ConversationError::malformed(format!("unknown goal {}", goal)));
        };
        if goal.goal_type != goal_type {
            return Err(ConversationError::malformed(format!(
                "goal {} does not belong to goal type {}",
                goal.id, goal_type
            )));
        }
        self.assign(user, state, date, GoalChoice::Existing(goal)).await
    }

    async fn typed_goal(
        &self,
        user: &User,
        state: &DialogState<TasksDialog>,
        text: &str,
    ) -> Result<(), ConversationError> {
        let Some((date, goal_type)) = state.params.pending() else {
            return Err(ConversationError::malformed("goal text with no category pending"));
        };
        match NewGoal::new(goal_type, text) {
            Ok(draft) => self.assign(user, state, date, GoalChoice::New(draft)).await,
            Err(_) => {
                self.transport.send(user.id, render::TYPE_GOAL, None).await?;
                Ok(())
            }
        }
    }
}

/// First instant of the user's local day `date`.
fn day_start(user: &User, date: NaiveDate) -> Timestamp {
    DayWindow::for_date(date, user.timezone).from()
}

#[async_trait]
impl FlowHandler for TasksFlow {
    fn flow(&self) -> FlowName {
        FlowName::Tasks
    }

    async fn handle(
        &self,
        user: &User,
        message: &dyn InboundMessage,
    ) -> Result<Option<FlowName>, ConversationError> {
        let command = message.command()?;
        let mut state = self
            .dialogs
            .load::<TasksDialog>(message.peer(), FlowName::Tasks)
            .await?;
        let now = self.clock.now();

        match command {
            Some(Command::Menu) => {
                self.directory.set_flow(user.id, FlowName::Menu).await?;
                return Ok(Some(FlowName::Menu));
            }
            Some(Command::CurrentTasks) => {
                if !self.send_marked_plan(user, now).await? {
                    self.transport.send(user.id, render::NOTHING_PLANNED, None).await?;
                }
            }
            Some(Command::UpdateTask) => self.today_status(user, now).await?,
            Some(Command::UpdateType { goal_type }) => {
                self.assignments.set_status(user, now, goal_type).await?;
                self.today_status(user, now).await?;
            }
            Some(Command::ObserveTasks) => {
                self.send_date_menu(user, |date| Command::ObserveDate { date })
                    .await?
            }
            Some(Command::ObserveDate { date }) => self.send_day_plan(user, day_start(user, date)).await?,
            Some(Command::ChangeTask) => {
                self.send_date_menu(user, |date| Command::ChangeDate { date })
                    .await?
            }
            Some(Command::ChangeDate { date }) => {
                self.send_day_plan(user, day_start(user, date)).await?;
                self.send_type_menu(user, date).await?;
            }
            Some(Command::ChangeType { goal_type, date }) => {
                self.choose_type(user, &mut state, goal_type, date).await?
            }
            Some(Command::ChoseGoal { goal }) => self.chose_goal(user, &state, goal).await?,
            None if state.params.awaits_text() => {
                self.typed_goal(user, &state, message.text()).await?
            }
            _ => self.send_main(user).await?,
        }
        Ok(None)
    }
}

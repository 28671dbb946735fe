//! Catalog entities: goal categories and the goals inside them.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{GoalId, GoalTypeId, ValidationError};

/// A fixed dimension of daily goals, e.g. "exercise".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalType {
    pub id: GoalTypeId,
    pub name: String,
    pub points: i32,
    /// Bindings of this type are offered for peer review.
    pub evaluated: bool,
    /// Goals are picked from the catalog instead of typed as free text.
    pub from_list: bool,
}

/// One concrete item inside a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub goal_type: GoalTypeId,
    pub description: String,
}

/// A goal that has not been persisted yet (free-text input).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGoal {
    goal_type: GoalTypeId,
    description: String,
}

impl NewGoal {
    pub fn new(goal_type: GoalTypeId, description: impl Into<String>) -> Result<Self, ValidationError> {
        let description = description.into().trim().to_string();
        if description.is_empty() {
            return Err(ValidationError::empty_field("description"));
        }
        Ok(Self {
            goal_type,
            description,
        })
    }

    pub fn goal_type(&self) -> GoalTypeId {
        self.goal_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// What to bind: a stored goal or one to be created first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalChoice {
    Existing(Goal),
    New(NewGoal),
}

impl GoalChoice {
    pub fn goal_type(&self) -> GoalTypeId {
        match self {
            GoalChoice::Existing(goal) => goal.goal_type,
            GoalChoice::New(draft) => draft.goal_type(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_goal_trims_description() {
        let draft = NewGoal::new(GoalTypeId::new(2), "  read 20 pages \n").unwrap();
        assert_eq!(draft.description(), "read 20 pages");
    }

    #[test]
    fn new_goal_rejects_blank_description() {
        assert_eq!(
            NewGoal::new(GoalTypeId::new(2), "   "),
            Err(ValidationError::empty_field("description"))
        );
    }

    #[test]
    fn choice_reports_goal_type() {
        let existing = GoalChoice::Existing(Goal {
            id: GoalId::new(1),
            goal_type: GoalTypeId::new(3),
            description: "run".to_string(),
        });
        let fresh = GoalChoice::New(NewGoal::new(GoalTypeId::new(4), "swim").unwrap());

        assert_eq!(existing.goal_type(), GoalTypeId::new(3));
        assert_eq!(fresh.goal_type(), GoalTypeId::new(4));
    }
}

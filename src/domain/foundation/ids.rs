//! Strongly-typed identifier value objects.
//!
//! Every entity in the store is keyed by a 64-bit integer. Users are keyed by
//! their chat platform peer id, so the same value addresses both the user row
//! and the conversation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw storage key.
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw storage key.
            pub const fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

integer_id!(
    /// Identifier of a registered user (equal to the chat peer id).
    UserId
);

integer_id!(
    /// Identifier of a goal category.
    GoalTypeId
);

integer_id!(
    /// Identifier of a concrete goal inside a category.
    GoalId
);

integer_id!(
    /// Identifier of a per-user, per-day goal binding.
    UserGoalId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_displays_raw_value() {
        assert_eq!(UserId::new(42).to_string(), "42");
    }

    #[test]
    fn id_parses_from_string() {
        let id: GoalTypeId = " 7 ".parse().unwrap();
        assert_eq!(id, GoalTypeId::new(7));
    }

    #[test]
    fn id_rejects_non_numeric_input() {
        assert!("abc".parse::<GoalId>().is_err());
    }

    #[test]
    fn id_serializes_transparently() {
        let json = serde_json::to_string(&UserGoalId::new(15)).unwrap();
        assert_eq!(json, "15");

        let back: UserGoalId = serde_json::from_str("15").unwrap();
        assert_eq!(back.value(), 15);
    }
}

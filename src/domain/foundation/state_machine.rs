//! State machine trait for lifecycle enums.
//!
//! Binding phases move strictly forward, so the trait only has to answer
//! "may I go there from here" and report terminal states.

use super::ValidationError;

/// Trait for enums that model a forward-only lifecycle.
///
/// ```ignore
/// let next = Phase::Planning.transition_to(Phase::Active)?;
/// assert!(Phase::Finished.is_terminal());
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

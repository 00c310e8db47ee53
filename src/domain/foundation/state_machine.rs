//! State machine trait for lifecycle status enums.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors list their allowed transitions once; callers move between
/// states only through [`StateMachine::transition_to`], so an undeclared
/// edge surfaces as an error instead of a silently inconsistent record.
///
/// ```ignore
/// let next = EventStatus::Complete.transition_to(EventStatus::AwaitingReply)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns all valid target states from the current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "status",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Door {
        Open,
        Closed,
        Locked,
        Removed,
    }

    impl StateMachine for Door {
        fn valid_transitions(&self) -> Vec<Self> {
            match self {
                Door::Open => vec![Door::Closed, Door::Removed],
                Door::Closed => vec![Door::Open, Door::Locked],
                Door::Locked => vec![Door::Closed],
                Door::Removed => vec![],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_declared_edge() {
        assert_eq!(Door::Closed.transition_to(Door::Locked), Ok(Door::Locked));
    }

    #[test]
    fn transition_to_fails_for_undeclared_edge() {
        let err = Door::Open.transition_to(Door::Locked).unwrap_err();
        assert_eq!(err.field(), "status");
    }

    #[test]
    fn can_transition_to_follows_valid_transitions() {
        for door in [Door::Open, Door::Closed, Door::Locked, Door::Removed] {
            for target in door.valid_transitions() {
                assert!(door.can_transition_to(&target));
            }
        }
        assert!(!Door::Locked.can_transition_to(&Door::Open));
    }

    #[test]
    fn is_terminal_only_without_outgoing_edges() {
        assert!(Door::Removed.is_terminal());
        assert!(!Door::Locked.is_terminal());
    }
}
